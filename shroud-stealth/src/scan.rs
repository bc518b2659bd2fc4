//! Stealth address scanning (recipient side).
//!
//! One point multiplication and one hash decide the view tag. Only when the
//! tag matches (or none was published) does the scan pay for the point
//! addition, compression and address hash.

use tracing::trace;

use shroud_core::error::Result;
use shroud_core::traits::CurveOps;
use shroud_core::types::{EthAddress, PrivateKey, PublicKey};
use shroud_crypto::derive::{verify_stealth_address, SharedSecret};
use shroud_crypto::{compute_shared_secret, derive_stealth_address, verify_view_tag, Secp256k1};

/// Outcome of checking one announcement against a recipient's keys.
pub(crate) enum AddressCheck {
    /// Published view tag differs; no point addition was done
    ViewTagMismatch,
    /// Full check ran and the address differs
    Mismatch,
    /// Address matched; the shared secret is kept for key recovery
    Match(SharedSecret),
}

/// Returns whether `stealth_address` belongs to the recipient holding
/// `viewing_private_key` and `spending_public_key`.
///
/// A non-matching announcement is `Ok(false)`, never an error. Errors are
/// reserved for inputs that cannot be used for point arithmetic.
pub fn check_stealth_address(
    stealth_address: &EthAddress,
    ephemeral_public_key: &PublicKey,
    viewing_private_key: &PrivateKey,
    spending_public_key: &PublicKey,
    view_tag: Option<u8>,
) -> Result<bool> {
    let check = check_with(
        &Secp256k1,
        stealth_address,
        ephemeral_public_key,
        viewing_private_key,
        spending_public_key,
        view_tag,
    )?;
    Ok(matches!(check, AddressCheck::Match(_)))
}

pub(crate) fn check_with<C: CurveOps + ?Sized>(
    curve: &C,
    stealth_address: &EthAddress,
    ephemeral_public_key: &PublicKey,
    viewing_private_key: &PrivateKey,
    spending_public_key: &PublicKey,
    view_tag: Option<u8>,
) -> Result<AddressCheck> {
    let shared_secret = compute_shared_secret(curve, viewing_private_key, ephemeral_public_key)?;

    if let Some(tag) = view_tag {
        if !verify_view_tag(shared_secret.as_bytes(), tag) {
            trace!(view_tag = tag, "view tag mismatch");
            return Ok(AddressCheck::ViewTagMismatch);
        }
    }

    let derived = derive_stealth_address(curve, spending_public_key, &shared_secret)?;
    let matched = verify_stealth_address(stealth_address, &derived);
    trace!(matched, tagged = view_tag.is_some(), "full stealth address check");

    Ok(if matched {
        AddressCheck::Match(shared_secret)
    } else {
        AddressCheck::Mismatch
    })
}
