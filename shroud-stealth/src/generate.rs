//! Stealth address generation (sender side).
//!
//! ```text
//! e             <- CSPRNG, resampled until 0 < e < n
//! ephemeral_pub = G * e
//! shared_secret = keccak256(compress(viewing_pk * e))
//! view_tag      = shared_secret[0]
//! stealth_pk    = spending_pk + G * (shared_secret mod n)
//! address       = keccak256(compress(stealth_pk))[12..32]
//! ```
//!
//! The ephemeral private key never leaves this module; it is zeroized when the
//! call returns.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use shroud_core::error::Result;
use shroud_core::traits::CurveOps;
use shroud_core::types::{Announcement, EthAddress, PrivateKey, PublicKey, StealthMetaAddress};
use shroud_crypto::{compute_shared_secret, derive_stealth_address, Secp256k1};

use crate::keys::random_private_key;

/// Output of a generation: where to send funds and what to announce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedStealthAddress {
    /// The one-time address to send funds to
    pub stealth_address: EthAddress,
    /// The ephemeral public key to publish (compressed)
    pub ephemeral_public_key: PublicKey,
    /// The view tag to publish alongside the ephemeral key
    pub view_tag: u8,
}

impl GeneratedStealthAddress {
    /// Builds the announcement a recipient scans for this payment.
    pub fn to_announcement(&self) -> Announcement {
        Announcement::new(self.stealth_address, self.ephemeral_public_key, self.view_tag)
    }
}

impl From<GeneratedStealthAddress> for Announcement {
    fn from(generated: GeneratedStealthAddress) -> Self {
        generated.to_announcement()
    }
}

/// Generates a stealth address using the operating system's CSPRNG.
///
/// # Errors
/// `EntropyUnavailable` if the OS random source fails.
pub fn generate_stealth_address(meta_address: &StealthMetaAddress) -> Result<GeneratedStealthAddress> {
    generate_stealth_address_with_rng(meta_address, &mut OsRng)
}

/// Parses a meta-address and generates a stealth address for it.
pub fn generate_stealth_address_from_str(meta_address: &str) -> Result<GeneratedStealthAddress> {
    let meta_address = StealthMetaAddress::parse(meta_address)?;
    generate_stealth_address(&meta_address)
}

/// Generates a stealth address, drawing the ephemeral key from `rng`.
///
/// A failing RNG aborts the call with `EntropyUnavailable`; there is no retry
/// and no fallback source.
pub fn generate_stealth_address_with_rng<R>(
    meta_address: &StealthMetaAddress,
    rng: &mut R,
) -> Result<GeneratedStealthAddress>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let ephemeral_sk = random_private_key(rng)?;
    generate_stealth_address_from_ephemeral_key(meta_address, &ephemeral_sk)
}

/// Generates a stealth address from a caller-chosen ephemeral private key.
///
/// # Security
/// Two payments with the same ephemeral key to the same recipient land on the
/// same stealth address and are linkable. Use this only for reproducing known
/// vectors; normal callers want [`generate_stealth_address`].
pub fn generate_stealth_address_from_ephemeral_key(
    meta_address: &StealthMetaAddress,
    ephemeral_sk: &PrivateKey,
) -> Result<GeneratedStealthAddress> {
    generate_with(&Secp256k1, meta_address, ephemeral_sk)
}

fn generate_with<C: CurveOps + ?Sized>(
    curve: &C,
    meta_address: &StealthMetaAddress,
    ephemeral_sk: &PrivateKey,
) -> Result<GeneratedStealthAddress> {
    let ephemeral_public_key = curve.public_key(ephemeral_sk)?;
    let shared_secret = compute_shared_secret(curve, ephemeral_sk, &meta_address.viewing_pk)?;
    let stealth_address = derive_stealth_address(curve, &meta_address.spending_pk, &shared_secret)?;

    Ok(GeneratedStealthAddress {
        stealth_address,
        ephemeral_public_key,
        view_tag: shared_secret.view_tag(),
    })
}
