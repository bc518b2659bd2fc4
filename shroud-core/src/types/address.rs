//! Address types for SHROUD.
//!
//! - [`StealthMetaAddress`]: The reusable `st:eth:0x...` text a recipient publishes
//! - [`EthAddress`]: A 20-byte Ethereum address, derived for a specific payment

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use super::PublicKey;
use crate::constants::{
    ETH_ADDRESS_SIZE, META_ADDRESS_KEY_HEX_LEN, META_ADDRESS_LENGTH, META_ADDRESS_PREFIX,
};
use crate::error::{Result, StealthError};

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// An ERC-5564 stealth meta-address for scheme `0x00`.
///
/// # Format
/// ```text
/// "st:eth:0x" || hex(spending_pk, 33 bytes) || hex(viewing_pk, 33 bytes)
/// ```
///
/// Exactly 141 characters. Hex digits may be upper- or lowercase on input;
/// [`Display`](std::fmt::Display) always emits lowercase.
///
/// # Example
/// ```
/// use shroud_core::{StealthMetaAddress, StealthError};
///
/// let err = StealthMetaAddress::parse("st:eth:0x1234").unwrap_err();
/// assert!(matches!(err, StealthError::MetaAddressWrongLength { .. }));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StealthMetaAddress {
    /// Spending public key - stealth public keys are offsets of this point
    pub spending_pk: PublicKey,
    /// Viewing public key - senders agree a shared secret with this point
    pub viewing_pk: PublicKey,
}

impl StealthMetaAddress {
    /// Creates a meta-address from its two public keys.
    pub fn new(spending_pk: PublicKey, viewing_pk: PublicKey) -> Self {
        Self {
            spending_pk,
            viewing_pk,
        }
    }

    /// Parses and validates a meta-address.
    ///
    /// The length is checked before the prefix, and both before any key is
    /// decoded. Each key must decode to a point on secp256k1.
    ///
    /// # Errors
    /// - `MetaAddressWrongLength` if `text` is not 141 characters
    /// - `MetaAddressWrongPrefix` if it does not start with `st:eth:0x`
    /// - `Hex` if a key half contains non-hex characters
    /// - `PublicKeyNotOnCurve` if a key half is not a valid compressed point
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() != META_ADDRESS_LENGTH {
            return Err(StealthError::MetaAddressWrongLength {
                expected: META_ADDRESS_LENGTH,
                actual: text.len(),
            });
        }

        let body = text
            .strip_prefix(META_ADDRESS_PREFIX)
            .ok_or(StealthError::MetaAddressWrongPrefix)?;

        // Byte slicing: a non-ASCII body fails hex decoding instead of panicking
        // on a char boundary.
        let (spending_hex, viewing_hex) = body.as_bytes().split_at(META_ADDRESS_KEY_HEX_LEN);

        let spending_pk = PublicKey::from_bytes(&hex::decode(spending_hex)?)?;
        let viewing_pk = PublicKey::from_bytes(&hex::decode(viewing_hex)?)?;

        Ok(Self {
            spending_pk,
            viewing_pk,
        })
    }

    /// Encodes to the canonical lowercase text form.
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}",
            META_ADDRESS_PREFIX,
            self.spending_pk.to_hex(),
            self.viewing_pk.to_hex()
        )
    }
}

impl std::fmt::Display for StealthMetaAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for StealthMetaAddress {
    type Err = StealthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for StealthMetaAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for StealthMetaAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A 20-byte Ethereum address.
///
/// The protocol only ever derives these from public keys; `from_bytes` exists
/// for callers holding candidate addresses taken from announcements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthAddress {
    #[serde(with = "hex")]
    bytes: [u8; ETH_ADDRESS_SIZE],
}

impl EthAddress {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ETH_ADDRESS_SIZE {
            return Err(StealthError::AddressWrongLength {
                expected: ETH_ADDRESS_SIZE,
                actual: bytes.len(),
            });
        }

        let mut arr = [0u8; ETH_ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub fn from_array(bytes: [u8; ETH_ADDRESS_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the address as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; ETH_ADDRESS_SIZE] {
        &self.bytes
    }

    /// Returns the EIP-55 mixed-case checksummed string.
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.bytes);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Parses from hex string (with or without 0x prefix). Checksums are not enforced.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the zero address.
    pub fn zero() -> Self {
        Self {
            bytes: [0u8; ETH_ADDRESS_SIZE],
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl std::fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EthAddress({})", self.to_checksum_string())
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_checksum_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const SPENDING_PK: &str = "03195eec0f562a7a92665f8d085abaf84fe496fa7c53a8a898bce045266b5a33dc";
    const VIEWING_PK: &str = "02e075c0c31f3abf191e801a2f61d603e46293cd5ac8c4b5e11fb00624cf7fa98c";

    fn vector_meta_address() -> String {
        format!("st:eth:0x{}{}", SPENDING_PK, VIEWING_PK)
    }

    #[test]
    fn test_parse_vector() {
        let meta = StealthMetaAddress::parse(&vector_meta_address()).unwrap();
        assert_eq!(meta.spending_pk.to_hex(), SPENDING_PK);
        assert_eq!(meta.viewing_pk.to_hex(), VIEWING_PK);
        assert_eq!(meta.to_string(), vector_meta_address());
    }

    #[test]
    fn test_parse_uppercase_hex() {
        let text = format!(
            "st:eth:0x{}{}",
            SPENDING_PK.to_uppercase(),
            VIEWING_PK.to_uppercase()
        );
        let meta: StealthMetaAddress = text.parse().unwrap();
        // Re-encoding normalizes to lowercase
        assert_eq!(meta.encode(), vector_meta_address());
    }

    #[test_case("" ; "empty")]
    #[test_case("st:eth:0x" ; "prefix only")]
    #[test_case("st:eth:0x03195eec" ; "truncated")]
    fn test_parse_wrong_length(text: &str) {
        assert!(matches!(
            StealthMetaAddress::parse(text),
            Err(StealthError::MetaAddressWrongLength { expected: 141, .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let text = format!("{}00", vector_meta_address());
        assert!(matches!(
            StealthMetaAddress::parse(&text),
            Err(StealthError::MetaAddressWrongLength { actual: 143, .. })
        ));
    }

    #[test_case("st:btc:0x" ; "wrong chain")]
    #[test_case("ST:ETH:0x" ; "uppercase prefix")]
    #[test_case("st:eth:0X" ; "uppercase x")]
    fn test_parse_wrong_prefix(prefix: &str) {
        let text = format!("{}{}{}", prefix, SPENDING_PK, VIEWING_PK);
        assert_eq!(text.len(), META_ADDRESS_LENGTH);
        assert!(matches!(
            StealthMetaAddress::parse(&text),
            Err(StealthError::MetaAddressWrongPrefix)
        ));
    }

    #[test]
    fn test_parse_invalid_hex() {
        let text = format!("st:eth:0x{}{}zz", SPENDING_PK, &VIEWING_PK[..64]);
        assert!(matches!(
            StealthMetaAddress::parse(&text),
            Err(StealthError::Hex(_))
        ));
    }

    #[test]
    fn test_parse_point_not_on_curve() {
        let bad_key = format!("02{}", "ff".repeat(32));
        let text = format!("st:eth:0x{}{}", SPENDING_PK, bad_key);
        assert!(matches!(
            StealthMetaAddress::parse(&text),
            Err(StealthError::PublicKeyNotOnCurve)
        ));
    }

    #[test]
    fn test_parse_non_ascii_does_not_panic() {
        // 141 bytes with a multi-byte character straddling the key boundary
        let mut text = format!("st:eth:0x{}", &SPENDING_PK[..65]);
        text.push('é');
        text.push_str(&VIEWING_PK[..65]);
        assert_eq!(text.len(), META_ADDRESS_LENGTH);
        assert!(StealthMetaAddress::parse(&text).is_err());
    }

    #[test]
    fn test_meta_address_serde() {
        let meta = StealthMetaAddress::parse(&vector_meta_address()).unwrap();
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, format!("\"{}\"", vector_meta_address()));
        let restored: StealthMetaAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, restored);
    }

    proptest! {
        #[test]
        fn prop_parse_rejects_wrong_length(text in "\\PC{0,200}") {
            prop_assume!(text.len() != META_ADDRESS_LENGTH);
            let is_wrong_length = matches!(
                StealthMetaAddress::parse(&text),
                Err(StealthError::MetaAddressWrongLength { .. })
            );
            prop_assert!(is_wrong_length);
        }

        #[test]
        fn prop_parse_rejects_wrong_prefix(prefix in "[a-zA-Z0-9:]{9}", body in "[0-9a-f]{132}") {
            prop_assume!(prefix != META_ADDRESS_PREFIX);
            let text = format!("{}{}", prefix, body);
            prop_assert!(matches!(
                StealthMetaAddress::parse(&text),
                Err(StealthError::MetaAddressWrongPrefix)
            ));
        }
    }

    #[test]
    fn test_eth_address_checksum_eip55_vector() {
        let addr = EthAddress::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(
            addr.to_checksum_string(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_eth_address_hex_roundtrip() {
        let addr = EthAddress::from_array([0x12; 20]);
        let hex = addr.to_checksum_string();
        let addr2 = EthAddress::from_hex(&hex).unwrap();
        assert_eq!(addr, addr2);
    }

    #[test]
    fn test_eth_address_wrong_length() {
        assert!(matches!(
            EthAddress::from_bytes(&[0u8; 19]),
            Err(StealthError::AddressWrongLength { expected: 20, actual: 19 })
        ));
    }

    #[test]
    fn test_eth_address_zero() {
        let zero = EthAddress::zero();
        assert!(zero.is_zero());

        let non_zero = EthAddress::from_array([1; 20]);
        assert!(!non_zero.is_zero());
    }
}
