//! # SHROUD Core
//!
//! Core types, errors, and traits for the SHROUD implementation of ERC-5564
//! stealth addresses (scheme `0x00`: secp256k1 with view tags).
//!
//! This crate provides the foundational building blocks used by all other SHROUD crates:
//!
//! - **Types**: Keys, Ethereum addresses, stealth meta-addresses, announcements
//! - **Errors**: One typed error per validation failure
//! - **Constants**: Byte layouts and protocol constants
//! - **Traits**: The curve seam ([`CurveOps`]) the protocol logic is written against
//!
//! ## Example
//!
//! ```rust
//! use shroud_core::StealthMetaAddress;
//!
//! let text = "st:eth:0x03195eec0f562a7a92665f8d085abaf84fe496fa7c53a8a898bce045266b5a33dc\
//!             02e075c0c31f3abf191e801a2f61d603e46293cd5ac8c4b5e11fb00624cf7fa98c";
//! let meta = StealthMetaAddress::parse(text).unwrap();
//! assert_eq!(meta.to_string(), text);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, StealthError};
pub use traits::*;
pub use types::*;
