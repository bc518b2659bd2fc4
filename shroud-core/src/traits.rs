//! Common traits for SHROUD.
//!
//! The protocol logic never touches curve arithmetic directly. It is written
//! against [`CurveOps`], which an ERC-5564 scheme implementation provides.
//! Scheme `0x00` (secp256k1) lives in `shroud-crypto`.

use crate::error::Result;
use crate::types::{PrivateKey, PublicKey};

// ═══════════════════════════════════════════════════════════════════════════════
// CURVE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Elliptic-curve operations a stealth-address scheme needs.
///
/// All inputs and outputs use the fixed-size wire layouts ([`PublicKey`] is a
/// compressed point, [`PrivateKey`] a canonical scalar). Implementations must
/// be stateless so they can be shared across scanning threads.
pub trait CurveOps: Send + Sync {
    /// ERC-5564 scheme id served by this implementation.
    fn scheme_id(&self) -> u8;

    /// Returns `G * secret`.
    fn public_key(&self, secret: &PrivateKey) -> Result<PublicKey>;

    /// Returns the compressed shared point `public * secret`.
    fn diffie_hellman(&self, secret: &PrivateKey, public: &PublicKey) -> Result<PublicKey>;

    /// Returns `public + G * (tweak mod n)`.
    ///
    /// `tweak` is an arbitrary 256-bit big-endian integer and is reduced, never rejected.
    fn tweak_public_key(&self, public: &PublicKey, tweak: &[u8; 32]) -> Result<PublicKey>;

    /// Returns `(secret + (tweak mod n)) mod n`, reducing `tweak` the same way
    /// as [`CurveOps::tweak_public_key`].
    fn tweak_private_key(&self, secret: &PrivateKey, tweak: &[u8; 32]) -> Result<PrivateKey>;
}
