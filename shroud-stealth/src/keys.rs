//! Recipient key sets.
//!
//! A recipient holds two secp256k1 key pairs:
//! - Spending keys: combined with each shared secret to derive stealth private keys
//! - Viewing keys: used to scan announcements (can be shared with auditors)
//!
//! Both public halves go into the published meta-address. Where the private
//! halves are stored is the caller's business; this type only holds them in
//! memory and wipes them on drop.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use shroud_core::constants::PRIVATE_KEY_SIZE;
use shroud_core::error::{Result, StealthError};
use shroud_core::traits::CurveOps;
use shroud_core::types::{
    KeyPair, PrivateKey, PublicKey, SpendingKeyPair, StealthMetaAddress, ViewingKeyPair,
};
use shroud_crypto::Secp256k1;

/// A recipient's spending and viewing keys.
#[derive(ZeroizeOnDrop)]
pub struct StealthKeys {
    spending: SpendingKeyPair,
    viewing: ViewingKeyPair,
    /// Cached meta-address
    #[zeroize(skip)]
    meta_address: StealthMetaAddress,
}

impl StealthKeys {
    /// Generates a new key set from the operating system's CSPRNG.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shroud_stealth::StealthKeys;
    ///
    /// let keys = StealthKeys::generate().unwrap();
    /// assert!(keys.meta_address().to_string().starts_with("st:eth:0x"));
    /// ```
    pub fn generate() -> Result<Self> {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generates a new key set, drawing both private keys from `rng`.
    pub fn generate_with_rng<R>(rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let spending = random_private_key(rng)?;
        let viewing = random_private_key(rng)?;
        Self::from_private_keys(spending, viewing)
    }

    /// Rebuilds a key set from existing private keys.
    pub fn from_private_keys(spending_sk: PrivateKey, viewing_sk: PrivateKey) -> Result<Self> {
        let curve = Secp256k1;
        let spending = KeyPair::new(curve.public_key(&spending_sk)?, spending_sk);
        let viewing = KeyPair::new(curve.public_key(&viewing_sk)?, viewing_sk);
        let meta_address = StealthMetaAddress::new(spending.public, viewing.public);

        Ok(Self {
            spending,
            viewing,
            meta_address,
        })
    }

    /// Returns the meta-address to publish.
    pub fn meta_address(&self) -> &StealthMetaAddress {
        &self.meta_address
    }

    /// Returns the spending public key.
    pub fn spending_public_key(&self) -> &PublicKey {
        &self.spending.public
    }

    /// Returns the viewing public key.
    pub fn viewing_public_key(&self) -> &PublicKey {
        &self.viewing.public
    }

    /// Returns the spending private key.
    pub fn spending_private_key(&self) -> &PrivateKey {
        &self.spending.secret
    }

    /// Returns the viewing private key.
    pub fn viewing_private_key(&self) -> &PrivateKey {
        &self.viewing.secret
    }

    /// Exports the public halves for sharing.
    ///
    /// The viewing secret is not part of the export; hand it over separately
    /// when granting scan access.
    pub fn viewing_key_export(&self) -> ViewingKeyExport {
        ViewingKeyExport {
            meta_address: self.meta_address,
            viewing_public_key: self.viewing.public,
            spending_public_key: self.spending.public,
        }
    }
}

impl std::fmt::Debug for StealthKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StealthKeys")
            .field("meta_address", &self.meta_address)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

/// Exported public key information.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingKeyExport {
    /// Published meta-address
    pub meta_address: StealthMetaAddress,
    /// Viewing public key
    pub viewing_public_key: PublicKey,
    /// Spending public key
    pub spending_public_key: PublicKey,
}

/// Draws a scalar in `[1, n-1]`, resampling out-of-range draws.
pub(crate) fn random_private_key<R>(rng: &mut R) -> Result<PrivateKey>
where
    R: RngCore + CryptoRng + ?Sized,
{
    loop {
        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| StealthError::EntropyUnavailable(e.to_string()))?;

        match PrivateKey::from_array(bytes) {
            Ok(key) => return Ok(key),
            Err(StealthError::PrivateKeyOutOfRange) => continue,
            Err(e) => return Err(e),
        }
    }
}
