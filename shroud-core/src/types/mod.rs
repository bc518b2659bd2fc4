//! Domain types for SHROUD.
//!
//! This module provides all the core data structures used throughout the protocol:
//!
//! - [`PublicKey`] / [`PrivateKey`] / [`KeyPair`]: secp256k1 keys in their wire layouts
//! - [`StealthMetaAddress`]: Published `st:eth:0x...` address for receiving payments
//! - [`EthAddress`]: 20-byte address derived for a specific payment
//! - [`Announcement`]: Stealth address + ephemeral key + view tag, as seen by a scanner

mod keys;
mod address;
mod announcement;

pub use keys::*;
pub use address::*;
pub use announcement::*;
