//! # SHROUD Stealth Address Protocol
//!
//! ERC-5564 scheme `0x00` (secp256k1 with view tags) for senders and recipients.
//!
//! This crate provides:
//!
//! - **Generation**: Derive a one-time address, ephemeral key and view tag from a meta-address
//! - **Scanning**: Check a candidate address, rejecting most announcements on the view tag alone
//! - **Recovery**: Compute the private key controlling a matched stealth address
//! - **Key Sets**: Create and hold a recipient's spending and viewing keys
//! - **Discovery**: Scan announcements and recover keys for matches in one step
//!
//! ## Quick Start
//!
//! ```rust
//! use shroud_crypto::{eth_address_from_private_key, Secp256k1};
//! use shroud_stealth::{
//!     check_stealth_address, compute_stealth_key, generate_stealth_address_from_str, StealthKeys,
//! };
//!
//! // Recipient: generate keys and publish the meta-address
//! let keys = StealthKeys::generate().unwrap();
//! let meta_address = keys.meta_address().to_string();
//!
//! // Sender: derive a one-time address from the published text
//! let generated = generate_stealth_address_from_str(&meta_address).unwrap();
//!
//! // Recipient: check the announcement, then recover the key
//! let is_ours = check_stealth_address(
//!     &generated.stealth_address,
//!     &generated.ephemeral_public_key,
//!     keys.viewing_private_key(),
//!     keys.spending_public_key(),
//!     Some(generated.view_tag),
//! )
//! .unwrap();
//! assert!(is_ours);
//!
//! let stealth_sk = compute_stealth_key(
//!     &generated.ephemeral_public_key,
//!     keys.viewing_private_key(),
//!     keys.spending_private_key(),
//! )
//! .unwrap();
//! assert_eq!(
//!     eth_address_from_private_key(&Secp256k1, &stealth_sk).unwrap(),
//!     generated.stealth_address
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod generate;
pub mod scan;
pub mod recover;
pub mod keys;
pub mod discovery;

pub use generate::{
    generate_stealth_address, generate_stealth_address_from_ephemeral_key,
    generate_stealth_address_from_str, generate_stealth_address_with_rng,
    GeneratedStealthAddress,
};
pub use scan::check_stealth_address;
pub use recover::compute_stealth_key;
pub use keys::{StealthKeys, ViewingKeyExport};
pub use discovery::{
    scan_announcement, scan_announcement_ignoring_view_tag, scan_announcements,
    scan_announcements_with_stats, DiscoveredPayment, ScanResult, ScanStats,
};
