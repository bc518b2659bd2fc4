//! Stealth private key recovery.

use shroud_core::error::Result;
use shroud_core::traits::CurveOps;
use shroud_core::types::{PrivateKey, PublicKey};
use shroud_crypto::{compute_shared_secret, derive_stealth_private_key, Secp256k1};

/// Computes the private key controlling the stealth address announced with
/// `ephemeral_public_key`.
///
/// ```text
/// stealth_sk = (spending_sk + (keccak256(compress(ephemeral_pub * viewing_sk)) mod n)) mod n
/// ```
///
/// The caller is expected to have matched the announcement with
/// [`check_stealth_address`](crate::scan::check_stealth_address) first; for a
/// foreign announcement this returns a valid but useless key.
///
/// # Errors
/// `PrivateKeyOutOfRange` if the sum is zero mod n.
pub fn compute_stealth_key(
    ephemeral_public_key: &PublicKey,
    viewing_private_key: &PrivateKey,
    spending_private_key: &PrivateKey,
) -> Result<PrivateKey> {
    recover_with(&Secp256k1, ephemeral_public_key, viewing_private_key, spending_private_key)
}

fn recover_with<C: CurveOps + ?Sized>(
    curve: &C,
    ephemeral_public_key: &PublicKey,
    viewing_private_key: &PrivateKey,
    spending_private_key: &PrivateKey,
) -> Result<PrivateKey> {
    let shared_secret = compute_shared_secret(curve, viewing_private_key, ephemeral_public_key)?;
    derive_stealth_private_key(curve, spending_private_key, &shared_secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate_stealth_address_with_rng;
    use crate::keys::StealthKeys;
    use proptest::prelude::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use shroud_crypto::eth_address_from_private_key;

    #[test]
    fn test_recover_known_vector() {
        let ephemeral_pk = PublicKey::from_hex(
            "02630c452e64a927da3658205dfa88bd80c1fe769fb1dd6d6b9bfec17122cd8913",
        )
        .unwrap();
        let viewing_sk = PrivateKey::from_hex(
            "05c2f8e1a9b3d7c6e4f0a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f6",
        )
        .unwrap();
        let spending_sk = PrivateKey::from_hex(
            "0b6ce8d7a1d9a3c1e7a46b6f0c11e1a4d5f0a2e63b8c6e9d71f4a2b3c5d6e7f8",
        )
        .unwrap();

        let stealth_sk = compute_stealth_key(&ephemeral_pk, &viewing_sk, &spending_sk).unwrap();
        assert_eq!(
            stealth_sk.to_hex(),
            "ad115f3252ebd330bf4bed4f13e220f944a29b6e320ca64b651fbcff64dfd5ee"
        );
        assert_eq!(
            Secp256k1.public_key(&stealth_sk).unwrap().to_hex(),
            "037bc79b3b48c2a7d898e0d7ef152da7479fdc817c8ac69a3e3bd7e746371caed9"
        );
    }

    #[test]
    fn test_recover_with_wrong_viewing_key_gives_other_key() {
        let mut rng = ChaCha20Rng::seed_from_u64(77);
        let keys = StealthKeys::generate_with_rng(&mut rng).unwrap();
        let other = StealthKeys::generate_with_rng(&mut rng).unwrap();
        let generated = generate_stealth_address_with_rng(keys.meta_address(), &mut rng).unwrap();

        let wrong = compute_stealth_key(
            &generated.ephemeral_public_key,
            other.viewing_private_key(),
            keys.spending_private_key(),
        )
        .unwrap();
        assert_ne!(
            eth_address_from_private_key(&Secp256k1, &wrong).unwrap(),
            generated.stealth_address
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_recovered_key_controls_generated_address(seed in any::<u64>()) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let keys = StealthKeys::generate_with_rng(&mut rng).unwrap();
            let generated = generate_stealth_address_with_rng(keys.meta_address(), &mut rng).unwrap();

            let stealth_sk = compute_stealth_key(
                &generated.ephemeral_public_key,
                keys.viewing_private_key(),
                keys.spending_private_key(),
            )
            .unwrap();

            prop_assert_eq!(
                eth_address_from_private_key(&Secp256k1, &stealth_sk).unwrap(),
                generated.stealth_address
            );
        }
    }
}
