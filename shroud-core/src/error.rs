//! Error types for SHROUD.
//!
//! Every failure is a local, deterministic validation error on caller-supplied
//! data, except [`StealthError::EntropyUnavailable`], which is fatal. A scan that
//! does not match is a normal `false` result and never appears here.

use thiserror::Error;

/// Result type alias using `StealthError`.
pub type Result<T> = std::result::Result<T, StealthError>;

/// Main error type for all SHROUD operations.
#[derive(Debug, Error)]
pub enum StealthError {
    // ═══════════════════════════════════════════════════════════════════════════
    // META-ADDRESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Meta-address text has the wrong length.
    #[error("Invalid meta-address length: expected {expected} characters, got {actual}")]
    MetaAddressWrongLength { expected: usize, actual: usize },

    /// Meta-address text does not start with `st:eth:0x`.
    #[error("Invalid meta-address prefix: expected \"st:eth:0x\"")]
    MetaAddressWrongPrefix,

    // ═══════════════════════════════════════════════════════════════════════════
    // KEY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Public key is not a 33-byte compressed encoding.
    #[error("Invalid public key: expected {expected} bytes, got {actual}")]
    PublicKeyWrongLength { expected: usize, actual: usize },

    /// Public key bytes do not decode to a point on secp256k1.
    #[error("Invalid public key: not a point on the curve")]
    PublicKeyNotOnCurve,

    /// Private key is not 32 bytes.
    #[error("Invalid private key: expected {expected} bytes, got {actual}")]
    PrivateKeyWrongLength { expected: usize, actual: usize },

    /// Private key scalar is zero or not below the curve order.
    #[error("Invalid private key: scalar out of range [1, n-1]")]
    PrivateKeyOutOfRange,

    /// A point addition produced the point at infinity.
    #[error("Derived point is the point at infinity")]
    PointAtInfinity,

    // ═══════════════════════════════════════════════════════════════════════════
    // ADDRESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Ethereum address is not 20 bytes.
    #[error("Invalid address: expected {expected} bytes, got {actual}")]
    AddressWrongLength { expected: usize, actual: usize },

    // ═══════════════════════════════════════════════════════════════════════════
    // ENCODING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // RUNTIME ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The secure random source failed. Never retried with a weaker source.
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StealthError {
    /// Returns true if this error rejects malformed caller input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            StealthError::MetaAddressWrongLength { .. }
                | StealthError::MetaAddressWrongPrefix
                | StealthError::PublicKeyWrongLength { .. }
                | StealthError::PublicKeyNotOnCurve
                | StealthError::PrivateKeyWrongLength { .. }
                | StealthError::PrivateKeyOutOfRange
                | StealthError::AddressWrongLength { .. }
                | StealthError::Hex(_)
        )
    }

    /// Returns true if the operation must be aborted rather than reported as bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StealthError::EntropyUnavailable(_) | StealthError::Internal(_)
        )
    }
}
