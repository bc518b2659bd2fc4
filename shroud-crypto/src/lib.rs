//! # SHROUD Cryptography
//!
//! Cryptographic building blocks for ERC-5564 scheme `0x00`.
//!
//! This crate provides:
//!
//! - **secp256k1**: [`Secp256k1`], the [`CurveOps`](shroud_core::CurveOps) implementation backed by `k256`
//! - **Hash**: Keccak256
//! - **View Tags**: First byte of the shared secret, plus distribution statistics
//! - **Derivation**: Shared secrets, stealth public/private keys, Ethereum addresses
//!
//! ## Security Properties
//!
//! - Scalar multiplication is constant-time (`k256`)
//! - Shared secrets and private keys are zeroized on drop
//! - The shared-secret scalar is reduced with a wide (512-bit) reduction
//!
//! ## Example
//!
//! ```rust,ignore
//! use shroud_crypto::{Secp256k1, compute_shared_secret, derive_stealth_address};
//!
//! let curve = Secp256k1;
//! let shared = compute_shared_secret(&curve, &viewing_sk, &ephemeral_pk)?;
//! let address = derive_stealth_address(&curve, &spending_pk, &shared)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod secp256k1;
pub mod hash;
pub mod view_tag;
pub mod derive;

// Re-export main functions at crate root
pub use secp256k1::Secp256k1;
pub use hash::keccak256;
pub use view_tag::{compute_view_tag, verify_view_tag, ViewTagStats};
pub use derive::{
    compute_shared_secret, derive_stealth_address, derive_stealth_private_key,
    derive_stealth_public_key, eth_address_from_private_key, eth_address_from_public_key,
    verify_stealth_address, SharedSecret,
};
