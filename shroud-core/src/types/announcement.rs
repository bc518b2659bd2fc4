//! Announcement values handed to scanners.
//!
//! Where announcements come from (events, an indexer, a file) is outside this
//! crate; scanners only need the three values a sender produced.

use serde::{Deserialize, Serialize};

use super::{EthAddress, PublicKey};

/// A single announcement to be checked by a recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Caller-assigned identifier (log index, row id); not interpreted here
    #[serde(default)]
    pub id: u64,
    /// The one-time address funds were sent to
    pub stealth_address: EthAddress,
    /// The sender's ephemeral public key (compressed)
    pub ephemeral_public_key: PublicKey,
    /// View tag published alongside, if the source carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_tag: Option<u8>,
}

impl Announcement {
    /// Creates an announcement carrying a view tag.
    pub fn new(stealth_address: EthAddress, ephemeral_public_key: PublicKey, view_tag: u8) -> Self {
        Self {
            id: 0,
            stealth_address,
            ephemeral_public_key,
            view_tag: Some(view_tag),
        }
    }

    /// Creates an announcement without a view tag; scanning it always takes the full path.
    pub fn without_view_tag(stealth_address: EthAddress, ephemeral_public_key: PublicKey) -> Self {
        Self {
            id: 0,
            stealth_address,
            ephemeral_public_key,
            view_tag: None,
        }
    }

    /// Sets the caller-assigned identifier.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G_HEX: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn test_announcement_serde() {
        let ann = Announcement::new(
            EthAddress::from_array([0xAB; 20]),
            PublicKey::from_hex(G_HEX).unwrap(),
            0x7f,
        )
        .with_id(9);

        let json = serde_json::to_string(&ann).unwrap();
        assert!(json.contains(G_HEX));
        let restored: Announcement = serde_json::from_str(&json).unwrap();
        assert_eq!(ann, restored);
    }

    #[test]
    fn test_announcement_without_view_tag_omits_field() {
        let ann = Announcement::without_view_tag(
            EthAddress::from_array([0x01; 20]),
            PublicKey::from_hex(G_HEX).unwrap(),
        );
        let json = serde_json::to_string(&ann).unwrap();
        assert!(!json.contains("view_tag"));
        assert_eq!(ann.id, 0);
    }
}
