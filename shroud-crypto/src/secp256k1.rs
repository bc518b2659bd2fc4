//! secp256k1 backend for ERC-5564 scheme `0x00`.
//!
//! Wraps `k256` behind [`CurveOps`]. Points cross the boundary as 33-byte
//! compressed encodings and scalars as 32-byte big-endian integers.
//!
//! ## Tweak Reduction
//!
//! The hashed shared secret is an arbitrary 256-bit integer and may exceed the
//! group order `n`. It is zero-extended into a 512-bit buffer and reduced
//! modulo `n`:
//!
//! ```text
//! tweak_scalar = (0^256 || keccak256(shared_point)) mod n
//! ```
//!
//! Other ERC-5564 implementations reduce the same way, so rejecting
//! out-of-range digests would break interoperability.

use k256::elliptic_curve::bigint::U512;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{NonZeroScalar, ProjectivePoint, Scalar, SecretKey};
use zeroize::Zeroize;

use shroud_core::constants::{PRIVATE_KEY_SIZE, SCHEME_ID_SECP256K1};
use shroud_core::error::{Result, StealthError};
use shroud_core::traits::CurveOps;
use shroud_core::types::{PrivateKey, PublicKey};

/// The secp256k1 implementation of [`CurveOps`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Secp256k1;

impl CurveOps for Secp256k1 {
    fn scheme_id(&self) -> u8 {
        SCHEME_ID_SECP256K1
    }

    fn public_key(&self, secret: &PrivateKey) -> Result<PublicKey> {
        let secret_key = to_secret_key(secret)?;
        encode_point(&secret_key.public_key())
    }

    fn diffie_hellman(&self, secret: &PrivateKey, public: &PublicKey) -> Result<PublicKey> {
        let scalar = to_secret_key(secret)?.to_nonzero_scalar();
        let point = to_point(public)? * *scalar;
        from_projective(point)
    }

    fn tweak_public_key(&self, public: &PublicKey, tweak: &[u8; 32]) -> Result<PublicKey> {
        let offset = ProjectivePoint::GENERATOR * reduce_wide(tweak);
        from_projective(to_point(public)? + offset)
    }

    fn tweak_private_key(&self, secret: &PrivateKey, tweak: &[u8; 32]) -> Result<PrivateKey> {
        let base = to_secret_key(secret)?.to_nonzero_scalar();
        let sum = *base + reduce_wide(tweak);

        let sum = Option::<NonZeroScalar>::from(NonZeroScalar::new(sum))
            .ok_or(StealthError::PrivateKeyOutOfRange)?;

        let bytes = SecretKey::from(sum).to_bytes();
        PrivateKey::from_bytes(bytes.as_slice())
    }
}

/// Reduces a 256-bit big-endian integer modulo the group order.
///
/// The input is zero-extended to 512 bits before reduction; the result is the
/// same integer `x mod n` for every `x`, including `x >= n`.
pub fn reduce_wide(bytes: &[u8; 32]) -> Scalar {
    let mut wide = [0u8; 2 * PRIVATE_KEY_SIZE];
    wide[PRIVATE_KEY_SIZE..].copy_from_slice(bytes);

    let scalar = <Scalar as Reduce<U512>>::reduce(U512::from_be_slice(&wide));
    wide.zeroize();
    scalar
}

fn to_secret_key(secret: &PrivateKey) -> Result<SecretKey> {
    SecretKey::from_slice(secret.as_bytes()).map_err(|_| StealthError::PrivateKeyOutOfRange)
}

fn to_point(public: &PublicKey) -> Result<ProjectivePoint> {
    let key = k256::PublicKey::from_sec1_bytes(public.as_bytes())
        .map_err(|_| StealthError::PublicKeyNotOnCurve)?;
    Ok(key.to_projective())
}

fn from_projective(point: ProjectivePoint) -> Result<PublicKey> {
    let key = k256::PublicKey::from_affine(point.to_affine())
        .map_err(|_| StealthError::PointAtInfinity)?;
    encode_point(&key)
}

fn encode_point(key: &k256::PublicKey) -> Result<PublicKey> {
    let encoded = key.to_encoded_point(true);
    PublicKey::from_bytes(encoded.as_bytes())
}
