//! Key types for SHROUD.
//!
//! - [`PublicKey`]: SEC1-compressed secp256k1 point (33 bytes)
//! - [`PrivateKey`]: secp256k1 scalar in `[1, n-1]` (32 bytes, zeroized on drop)
//! - [`KeyPair`]: Combined public + private key
//! - [`SpendingKeyPair`] / [`ViewingKeyPair`]: the two roles in a meta-address

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
use crate::error::{Result, StealthError};

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Compressed secp256k1 public key.
///
/// Construction always validates that the bytes decode to a point on the curve,
/// so every `PublicKey` in circulation is usable for point arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl PublicKey {
    /// Creates a public key from SEC1-compressed bytes.
    ///
    /// # Errors
    /// `PublicKeyWrongLength` if `bytes` is not 33 bytes long,
    /// `PublicKeyNotOnCurve` if it does not decode to a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(StealthError::PublicKeyWrongLength {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            });
        }

        k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| StealthError::PublicKeyNotOnCurve)?;

        let mut arr = [0u8; PUBLIC_KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a public key from a fixed-size array.
    pub fn from_array(bytes: [u8; PUBLIC_KEY_SIZE]) -> Result<Self> {
        Self::from_bytes(&bytes)
    }

    /// Returns the raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the public key as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded public key (lowercase, no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Creates a public key from a hex string, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

// Serde implementation that uses hex encoding
impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// secp256k1 private key.
///
/// This key is sensitive and will be automatically zeroized when dropped.
/// Never expose this key in logs or error messages. It deliberately implements
/// neither `Serialize` nor `Display`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; PRIVATE_KEY_SIZE],
}

impl PrivateKey {
    /// Creates a private key from 32 big-endian bytes.
    ///
    /// # Errors
    /// `PrivateKeyWrongLength` if `bytes` is not 32 bytes long,
    /// `PrivateKeyOutOfRange` if the scalar is zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(StealthError::PrivateKeyWrongLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            });
        }

        k256::SecretKey::from_slice(bytes).map_err(|_| StealthError::PrivateKeyOutOfRange)?;

        let mut arr = [0u8; PRIVATE_KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a private key from a fixed-size array.
    pub fn from_array(mut bytes: [u8; PRIVATE_KEY_SIZE]) -> Result<Self> {
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Creates a private key from a hex string, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(s)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Returns the raw bytes of the private key.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the private key as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded private key for export to a wallet.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes[..].ct_eq(&other.bytes[..]).into()
    }
}

impl Eq for PrivateKey {}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose private key content
        write!(f, "PrivateKey([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// A complete secp256k1 key pair (public + private).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    /// Public key (safe to share)
    #[zeroize(skip)]
    pub public: PublicKey,
    /// Private key (keep private, auto-zeroized)
    pub secret: PrivateKey,
}

impl KeyPair {
    /// Creates a new key pair from public and private keys.
    ///
    /// The caller is responsible for the two halves belonging together; use
    /// the curve implementation to derive `public` from `secret`.
    pub fn new(public: PublicKey, secret: PrivateKey) -> Self {
        Self { public, secret }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Spending key pair - controls funds at discovered stealth addresses.
///
/// The spending public key is part of the meta-address.
/// The spending private key is combined with each shared secret to derive
/// stealth private keys.
pub type SpendingKeyPair = KeyPair;

/// Viewing key pair - used to scan for incoming payments.
///
/// The viewing public key is part of the meta-address.
/// The viewing private key can be shared with third parties (e.g., auditors)
/// to let them identify incoming payments without spending ability.
pub type ViewingKeyPair = KeyPair;
