//! Stealth key and address derivation.
//!
//! This module implements the shared-secret and derivation steps both sides
//! of an ERC-5564 payment run.
//!
//! ## Derivation Flow
//!
//! ```text
//! shared_point  = view_pub * e            (sender)
//!               = ephemeral_pub * view_sk (recipient)
//!       ↓
//! shared_secret = keccak256(compress(shared_point))
//!       ↓
//! view_tag      = shared_secret[0]
//! stealth_pk    = spending_pk + G * (shared_secret mod n)
//!       ↓
//! eth_address   = keccak256(compress(stealth_pk))[12..32]
//! ```
//!
//! ## Private Key Derivation
//!
//! Only the recipient can derive the stealth private key:
//!
//! ```text
//! stealth_sk = (spending_sk + (shared_secret mod n)) mod n
//! ```

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use shroud_core::constants::{ETH_ADDRESS_SIZE, KECCAK256_SIZE};
use shroud_core::error::Result;
use shroud_core::traits::CurveOps;
use shroud_core::types::{EthAddress, PrivateKey, PublicKey};

use crate::hash::keccak256;
use crate::view_tag::compute_view_tag;

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED SECRET
// ═══════════════════════════════════════════════════════════════════════════════

/// Keccak256 of the compressed ECDH point, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; KECCAK256_SIZE]);

impl SharedSecret {
    /// Wraps an already hashed shared secret.
    pub fn from_hashed(bytes: [u8; KECCAK256_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the hashed secret.
    ///
    /// # Security
    /// Anyone holding these bytes and the spending public key can link the
    /// payment. Do not log or persist them.
    pub fn as_bytes(&self) -> &[u8; KECCAK256_SIZE] {
        &self.0
    }

    /// Returns the view tag (first byte).
    pub fn view_tag(&self) -> u8 {
        compute_view_tag(&self.0)
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

/// Computes the hashed shared secret `keccak256(compress(public * secret))`.
///
/// The sender passes the ephemeral private key and the viewing public key;
/// the recipient passes the viewing private key and the ephemeral public key.
/// Both get the same bytes.
pub fn compute_shared_secret<C: CurveOps + ?Sized>(
    curve: &C,
    secret: &PrivateKey,
    public: &PublicKey,
) -> Result<SharedSecret> {
    let shared_point = curve.diffie_hellman(secret, public)?;
    Ok(SharedSecret(keccak256(shared_point.as_bytes())))
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH KEY DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives `spending_pk + G * (shared_secret mod n)`.
pub fn derive_stealth_public_key<C: CurveOps + ?Sized>(
    curve: &C,
    spending_pk: &PublicKey,
    shared_secret: &SharedSecret,
) -> Result<PublicKey> {
    curve.tweak_public_key(spending_pk, shared_secret.as_bytes())
}

/// Derives `(spending_sk + (shared_secret mod n)) mod n`.
///
/// # Errors
/// `PrivateKeyOutOfRange` if the sum is zero.
pub fn derive_stealth_private_key<C: CurveOps + ?Sized>(
    curve: &C,
    spending_sk: &PrivateKey,
    shared_secret: &SharedSecret,
) -> Result<PrivateKey> {
    curve.tweak_private_key(spending_sk, shared_secret.as_bytes())
}

/// Derives the stealth Ethereum address for a spending key and shared secret.
pub fn derive_stealth_address<C: CurveOps + ?Sized>(
    curve: &C,
    spending_pk: &PublicKey,
    shared_secret: &SharedSecret,
) -> Result<EthAddress> {
    let stealth_pk = derive_stealth_public_key(curve, spending_pk, shared_secret)?;
    Ok(eth_address_from_public_key(&stealth_pk))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESSES
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives an address from a compressed public key.
///
/// ```text
/// address = keccak256(pubkey_33_bytes)[12..32]
/// ```
///
/// This hashes the 33-byte compressed encoding, not the 64-byte uncompressed
/// coordinates an Ethereum account uses.
pub fn eth_address_from_public_key(public: &PublicKey) -> EthAddress {
    let hash = keccak256(public.as_bytes());
    let mut bytes = [0u8; ETH_ADDRESS_SIZE];
    bytes.copy_from_slice(&hash[KECCAK256_SIZE - ETH_ADDRESS_SIZE..]);
    EthAddress::from_array(bytes)
}

/// Derives the address controlled by a private key.
pub fn eth_address_from_private_key<C: CurveOps + ?Sized>(
    curve: &C,
    secret: &PrivateKey,
) -> Result<EthAddress> {
    let public = curve.public_key(secret)?;
    Ok(eth_address_from_public_key(&public))
}

/// Compares two addresses in constant time.
pub fn verify_stealth_address(expected: &EthAddress, derived: &EthAddress) -> bool {
    expected.as_bytes().ct_eq(derived.as_bytes()).into()
}
