//! Protocol constants for SHROUD.
//!
//! Byte layouts follow ERC-5564 scheme `0x00` (secp256k1 with view tags).

// ═══════════════════════════════════════════════════════════════════════════════
// SCHEME
// ═══════════════════════════════════════════════════════════════════════════════

/// ERC-5564 scheme id implemented by this workspace.
pub const SCHEME_ID_SECP256K1: u8 = 0x00;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a secp256k1 private key (big-endian scalar).
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of a SEC1-compressed secp256k1 public key (tag byte + x-coordinate).
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Order `n` of the secp256k1 group, big-endian.
pub const SECP256K1_ORDER: [u8; PRIVATE_KEY_SIZE] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Prefix of every scheme `0x00` stealth meta-address.
pub const META_ADDRESS_PREFIX: &str = "st:eth:0x";

/// Hex characters per encoded public key.
pub const META_ADDRESS_KEY_HEX_LEN: usize = 2 * PUBLIC_KEY_SIZE;

/// Total length of a stealth meta-address.
/// 9 + 66 + 66 = 141 characters
pub const META_ADDRESS_LENGTH: usize = META_ADDRESS_PREFIX.len() + 2 * META_ADDRESS_KEY_HEX_LEN;

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW TAG CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of view tag in bytes.
/// Using 1 byte gives 99.6% filtering efficiency (1/256 false positive rate).
pub const VIEW_TAG_SIZE: usize = 1;

/// Number of possible view tag values (2^8 = 256).
pub const VIEW_TAG_SPACE: usize = 256;

/// Expected filtering efficiency as a percentage.
pub const VIEW_TAG_EFFICIENCY: f64 = 99.609375; // (255/256) * 100

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of Ethereum address in bytes (20 bytes = 160 bits).
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of keccak256 hash output.
pub const KECCAK256_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// PERFORMANCE TUNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Default batch size for scanning announcements.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 1000;

/// Maximum announcements to scan in a single batch.
pub const MAX_SCAN_BATCH_SIZE: usize = 10_000;

/// Default number of concurrent scanning workers.
pub const DEFAULT_SCAN_CONCURRENCY: usize = 4;
