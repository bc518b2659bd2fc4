//! Payment discovery (recipient scan).
//!
//! Combines the scanner and the key recoverer over [`Announcement`] values:
//! the shared secret is computed once per announcement and reused for the
//! view tag, the address check and, on a match, the private key.

use tracing::{debug, trace};

use shroud_core::error::{Result, StealthError};
use shroud_core::traits::CurveOps;
use shroud_core::types::{Announcement, EthAddress, PrivateKey};
use shroud_crypto::{derive_stealth_private_key, eth_address_from_private_key, Secp256k1};

use crate::keys::StealthKeys;
use crate::scan::{check_with, AddressCheck};

/// Result of scanning a single announcement.
#[derive(Debug)]
pub enum ScanResult {
    /// View tag didn't match - rejected before any point addition
    ViewTagMismatch,
    /// Full check ran and the address is someone else's
    NotForUs,
    /// Address matched - payment discovered
    Discovered(DiscoveredPayment),
}

impl ScanResult {
    /// Returns true if a payment was discovered.
    pub fn is_discovered(&self) -> bool {
        matches!(self, ScanResult::Discovered(_))
    }

    /// Returns the discovered payment if present.
    pub fn into_payment(self) -> Option<DiscoveredPayment> {
        match self {
            ScanResult::Discovered(payment) => Some(payment),
            _ => None,
        }
    }
}

/// A payment found while scanning, with the key that controls it.
#[derive(Debug, Clone)]
pub struct DiscoveredPayment {
    /// The announcement that matched
    pub announcement: Announcement,
    /// Private key for `announcement.stealth_address` (zeroized on drop)
    pub stealth_private_key: PrivateKey,
}

impl DiscoveredPayment {
    /// The stealth address holding the funds.
    pub fn address(&self) -> &EthAddress {
        &self.announcement.stealth_address
    }
}

/// Statistics for scanning operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanStats {
    /// Total announcements scanned
    pub total_scanned: u64,
    /// Announcements rejected by the view tag alone
    pub view_tag_skipped: u64,
    /// Announcements that needed the full address check
    pub full_checks: u64,
    /// Number of payments discovered
    pub discoveries: u64,
    /// Number of announcements that could not be processed
    pub errors: u64,
    /// Announcements passed over by a view tag filter, without any curve work
    pub filtered: u64,
    /// Duration of the scan in milliseconds
    pub duration_ms: u64,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scan result.
    pub fn record(&mut self, result: &ScanResult) {
        self.total_scanned += 1;
        match result {
            ScanResult::ViewTagMismatch => self.view_tag_skipped += 1,
            ScanResult::NotForUs => self.full_checks += 1,
            ScanResult::Discovered(_) => {
                self.full_checks += 1;
                self.discoveries += 1;
            }
        }
    }

    /// Records an announcement excluded by a view tag filter.
    pub fn record_filtered(&mut self) {
        self.total_scanned += 1;
        self.filtered += 1;
    }

    /// Records an announcement that failed to scan.
    pub fn record_error(&mut self) {
        self.total_scanned += 1;
        self.errors += 1;
    }

    /// Adds the counters of `other` into `self`. Durations are not summed.
    pub fn merge(&mut self, other: &ScanStats) {
        self.total_scanned += other.total_scanned;
        self.view_tag_skipped += other.view_tag_skipped;
        self.full_checks += other.full_checks;
        self.discoveries += other.discoveries;
        self.errors += other.errors;
        self.filtered += other.filtered;
    }

    /// Returns the scan rate (announcements per second).
    pub fn rate(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.total_scanned as f64 / self.duration_ms as f64) * 1000.0
        }
    }

    /// Returns the filter efficiency (percentage of announcements rejected by view tag).
    pub fn filter_efficiency(&self) -> f64 {
        if self.total_scanned == 0 {
            0.0
        } else {
            (self.view_tag_skipped as f64 / self.total_scanned as f64) * 100.0
        }
    }
}

/// Scans one announcement, using its view tag when it carries one.
pub fn scan_announcement(announcement: &Announcement, keys: &StealthKeys) -> Result<ScanResult> {
    scan(announcement, keys, announcement.view_tag)
}

/// Scans one announcement with the full address check, ignoring any view tag.
pub fn scan_announcement_ignoring_view_tag(
    announcement: &Announcement,
    keys: &StealthKeys,
) -> Result<ScanResult> {
    scan(announcement, keys, None)
}

fn scan(announcement: &Announcement, keys: &StealthKeys, view_tag: Option<u8>) -> Result<ScanResult> {
    scan_with(&Secp256k1, announcement, keys, view_tag)
}

fn scan_with<C: CurveOps + ?Sized>(
    curve: &C,
    announcement: &Announcement,
    keys: &StealthKeys,
    view_tag: Option<u8>,
) -> Result<ScanResult> {
    let check = check_with(
        curve,
        &announcement.stealth_address,
        &announcement.ephemeral_public_key,
        keys.viewing_private_key(),
        keys.spending_public_key(),
        view_tag,
    )?;

    let shared_secret = match check {
        AddressCheck::ViewTagMismatch => return Ok(ScanResult::ViewTagMismatch),
        AddressCheck::Mismatch => {
            trace!(id = announcement.id, "address differs");
            return Ok(ScanResult::NotForUs);
        }
        AddressCheck::Match(shared_secret) => shared_secret,
    };

    let stealth_private_key =
        derive_stealth_private_key(curve, keys.spending_private_key(), &shared_secret)?;

    // G * stealth_sk must land on the announced address
    if eth_address_from_private_key(curve, &stealth_private_key)? != announcement.stealth_address {
        return Err(StealthError::Internal(
            "recovered key does not control the matched address".into(),
        ));
    }

    debug!(id = announcement.id, "discovered stealth payment");
    Ok(ScanResult::Discovered(DiscoveredPayment {
        announcement: *announcement,
        stealth_private_key,
    }))
}

/// Scans announcements in order and returns the payments found.
///
/// Announcements that fail to scan are skipped; use
/// [`scan_announcements_with_stats`] to see how many.
pub fn scan_announcements(announcements: &[Announcement], keys: &StealthKeys) -> Vec<DiscoveredPayment> {
    scan_announcements_with_stats(announcements, keys).0
}

/// Like [`scan_announcements`], also returning per-outcome counters.
pub fn scan_announcements_with_stats(
    announcements: &[Announcement],
    keys: &StealthKeys,
) -> (Vec<DiscoveredPayment>, ScanStats) {
    let mut stats = ScanStats::new();
    let mut found = Vec::new();

    for announcement in announcements {
        match scan_announcement(announcement, keys) {
            Ok(result) => {
                stats.record(&result);
                if let Some(payment) = result.into_payment() {
                    found.push(payment);
                }
            }
            Err(e) => {
                debug!(id = announcement.id, error = %e, "announcement failed to scan");
                stats.record_error();
            }
        }
    }

    (found, stats)
}
