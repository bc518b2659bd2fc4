//! # SHROUD Scanner
//!
//! Batch scanning of announcements to discover payments.
//!
//! ## Features
//!
//! - **Batch Processing**: Scans announcements in configurable batches
//! - **Progress Reporting**: Callbacks for UI progress updates
//! - **Resumable Scans**: Track position to resume interrupted scans
//! - **Concurrent Scanning**: Batches on tokio's blocking pool, results in input order
//!
//! ## Example
//!
//! ```rust,no_run
//! use shroud_scanner::{Scanner, ScannerConfig};
//! use shroud_stealth::StealthKeys;
//!
//! # async fn run(announcements: Vec<shroud_core::Announcement>) -> shroud_core::Result<()> {
//! let keys = StealthKeys::generate()?;
//! let scanner = Scanner::with_config(keys, ScannerConfig::from_env()?)?;
//!
//! for payment in scanner.scan_concurrent(announcements).await? {
//!     println!("Found payment at: {}", payment.address());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use shroud_core::error::{Result, StealthError};
use shroud_core::types::Announcement;
use shroud_stealth::discovery::{
    scan_announcement, scan_announcement_ignoring_view_tag, DiscoveredPayment, ScanResult,
    ScanStats,
};
use shroud_stealth::StealthKeys;

pub use config::ScannerConfig;

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(ScanProgress) + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRESS & POSITION
// ═══════════════════════════════════════════════════════════════════════════════

/// Scan progress information.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Total announcements to scan
    pub total: u64,
    /// Announcements scanned so far
    pub scanned: u64,
    /// Discoveries found so far
    pub discoveries: u64,
    /// Current scan rate (announcements per second)
    pub rate: f64,
    /// Estimated time remaining in seconds
    pub eta_seconds: Option<f64>,
    /// Percentage complete (0-100)
    pub percent: f64,
}

impl ScanProgress {
    /// Creates a new progress tracker.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            scanned: 0,
            discoveries: 0,
            rate: 0.0,
            eta_seconds: None,
            percent: 0.0,
        }
    }

    /// Updates progress with new values.
    pub fn update(&mut self, scanned: u64, discoveries: u64, elapsed_ms: u64) {
        self.scanned = scanned;
        self.discoveries = discoveries;

        if elapsed_ms > 0 {
            self.rate = (scanned as f64 / elapsed_ms as f64) * 1000.0;
        }

        if self.total > 0 {
            self.percent = (scanned as f64 / self.total as f64) * 100.0;

            if self.rate > 0.0 {
                let remaining = self.total.saturating_sub(scanned);
                self.eta_seconds = Some(remaining as f64 / self.rate);
            }
        }
    }
}

/// Scan position for resumable scanning.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPosition {
    /// Id of the last announcement scanned
    pub last_id: Option<u64>,
    /// Total announcements scanned in this session
    pub total_scanned: u64,
    /// Total discoveries in this session
    pub total_discoveries: u64,
}

impl ScanPosition {
    /// Creates a new scan position.
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&mut self, batch: &BatchOutcome) {
        if batch.last_id.is_some() {
            self.last_id = batch.last_id;
        }
        self.total_scanned += batch.stats.total_scanned;
        self.total_discoveries += batch.stats.discoveries;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNER
// ═══════════════════════════════════════════════════════════════════════════════

/// Main scanner for discovering payments.
pub struct Scanner {
    /// Recipient keys, shared with blocking scan tasks
    keys: Arc<StealthKeys>,
    /// Scan configuration
    config: ScannerConfig,
    /// Current scan position
    position: RwLock<ScanPosition>,
    /// Scan statistics
    stats: RwLock<ScanStats>,
}

impl Scanner {
    /// Creates a scanner with the default configuration.
    pub fn new(keys: StealthKeys) -> Self {
        Self {
            keys: Arc::new(keys),
            config: ScannerConfig::default(),
            position: RwLock::new(ScanPosition::new()),
            stats: RwLock::new(ScanStats::new()),
        }
    }

    /// Creates a scanner with a custom configuration.
    ///
    /// # Errors
    /// `Config` if the configuration fails [`ScannerConfig::validate`].
    pub fn with_config(keys: StealthKeys, config: ScannerConfig) -> Result<Self> {
        config.validate()?;
        let mut scanner = Self::new(keys);
        scanner.config = config;
        Ok(scanner)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Returns the current scan position.
    pub fn position(&self) -> ScanPosition {
        self.position.read().clone()
    }

    /// Returns the current statistics.
    pub fn stats(&self) -> ScanStats {
        self.stats.read().clone()
    }

    /// Resets the scan position and statistics.
    pub fn reset_position(&self) {
        *self.position.write() = ScanPosition::new();
        *self.stats.write() = ScanStats::new();
    }

    /// Scans a single announcement.
    pub fn scan_one(&self, announcement: &Announcement) -> Result<ScanResult> {
        let result = scan_with_options(&self.keys, announcement, self.config.use_view_tags);
        let mut stats = self.stats.write();
        match &result {
            Ok(outcome) => stats.record(outcome),
            Err(_) => stats.record_error(),
        }
        result
    }

    /// Scans announcements in order on the calling thread.
    #[instrument(skip(self, announcements), fields(count = announcements.len()))]
    pub fn scan(&self, announcements: &[Announcement]) -> Vec<DiscoveredPayment> {
        self.scan_inner(announcements, None)
    }

    /// Scans announcements in order, reporting progress after every batch.
    #[instrument(skip(self, announcements, progress_callback), fields(count = announcements.len()))]
    pub fn scan_with_progress(
        &self,
        announcements: &[Announcement],
        progress_callback: ProgressCallback,
    ) -> Vec<DiscoveredPayment> {
        self.scan_inner(announcements, Some(&progress_callback))
    }

    fn scan_inner(
        &self,
        announcements: &[Announcement],
        progress_callback: Option<&ProgressCallback>,
    ) -> Vec<DiscoveredPayment> {
        let start = Instant::now();
        let mut discoveries = Vec::new();
        let mut progress = ScanProgress::new(announcements.len() as u64);
        let mut session = ScanStats::new();

        info!(batch_size = self.config.batch_size, "Starting scan");

        for (index, batch) in announcements.chunks(self.config.batch_size).enumerate() {
            let outcome = scan_batch(&self.keys, batch, &self.config);
            debug!(
                batch = index,
                scanned = outcome.stats.total_scanned,
                found = outcome.found.len(),
                "Scanned batch"
            );

            self.absorb(&outcome);
            session.merge(&outcome.stats);
            discoveries.extend(outcome.found);

            if let Some(callback) = progress_callback {
                progress.update(
                    session.total_scanned,
                    discoveries.len() as u64,
                    start.elapsed().as_millis() as u64,
                );
                callback(progress.clone());
            }

            if self.config.stop_on_first && !discoveries.is_empty() {
                info!("Stopping on first discovery");
                break;
            }
        }

        self.finish(start, &mut session, discoveries.len());
        discoveries
    }

    /// Scans announcements on tokio's blocking pool, `concurrency` batches at a time.
    ///
    /// Discoveries come back in input order. With `stop_on_first`, outcomes are
    /// consumed in order up to the first batch holding a discovery; batches
    /// after it are neither counted nor reflected in [`Scanner::position`], so a
    /// resumed scan picks up right after the returned payment.
    ///
    /// # Errors
    /// `Internal` if a scanning task panics or is cancelled.
    #[instrument(skip(self, announcements), fields(count = announcements.len()))]
    pub async fn scan_concurrent(
        &self,
        announcements: Vec<Announcement>,
    ) -> Result<Vec<DiscoveredPayment>> {
        let start = Instant::now();
        let config = Arc::new(self.config.clone());

        info!(
            batch_size = config.batch_size,
            concurrency = config.concurrency,
            "Starting concurrent scan"
        );

        let batches: Vec<Vec<Announcement>> = announcements
            .chunks(config.batch_size)
            .map(<[Announcement]>::to_vec)
            .collect();

        let mut outcomes = stream::iter(batches)
            .map(|batch| {
                let keys = Arc::clone(&self.keys);
                let config = Arc::clone(&config);
                async move {
                    tokio::task::spawn_blocking(move || scan_batch(&keys, &batch, &config))
                        .await
                        .map_err(|e| StealthError::Internal(format!("scan task failed: {e}")))
                }
            })
            .buffered(config.concurrency);

        let mut session = ScanStats::new();
        let mut discoveries = Vec::new();
        while let Some(outcome) = outcomes.try_next().await? {
            self.absorb(&outcome);
            session.merge(&outcome.stats);
            discoveries.extend(outcome.found);

            if config.stop_on_first && !discoveries.is_empty() {
                info!("Stopping on first discovery");
                break;
            }
        }

        self.finish(start, &mut session, discoveries.len());
        Ok(discoveries)
    }

    fn absorb(&self, outcome: &BatchOutcome) {
        self.stats.write().merge(&outcome.stats);
        self.position.write().advance(outcome);
    }

    fn finish(&self, start: Instant, session: &mut ScanStats, found: usize) {
        session.duration_ms = start.elapsed().as_millis() as u64;
        self.stats.write().duration_ms += session.duration_ms;

        if session.errors > 0 {
            warn!(errors = session.errors, "Some announcements could not be scanned");
        }

        info!(
            discoveries = found,
            scanned = session.total_scanned,
            skipped_by_view_tag = session.view_tag_skipped,
            duration_ms = session.duration_ms,
            rate = format!("{:.2}/s", session.rate()),
            "Scan complete"
        );
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("keys", &self.keys)
            .field("config", &self.config)
            .field("position", &*self.position.read())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BATCHES
// ═══════════════════════════════════════════════════════════════════════════════

struct BatchOutcome {
    found: Vec<DiscoveredPayment>,
    stats: ScanStats,
    last_id: Option<u64>,
}

fn scan_with_options(
    keys: &StealthKeys,
    announcement: &Announcement,
    use_view_tags: bool,
) -> Result<ScanResult> {
    if use_view_tags {
        scan_announcement(announcement, keys)
    } else {
        scan_announcement_ignoring_view_tag(announcement, keys)
    }
}

fn scan_batch(keys: &StealthKeys, batch: &[Announcement], config: &ScannerConfig) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        found: Vec::new(),
        stats: ScanStats::new(),
        last_id: None,
    };

    for announcement in batch {
        outcome.last_id = Some(announcement.id);

        if !config.accepts(announcement.view_tag) {
            outcome.stats.record_filtered();
            continue;
        }

        match scan_with_options(keys, announcement, config.use_view_tags) {
            Ok(result) => {
                outcome.stats.record(&result);
                if let Some(payment) = result.into_payment() {
                    outcome.found.push(payment);
                    if config.stop_on_first {
                        break;
                    }
                }
            }
            Err(e) => {
                debug!(id = announcement.id, error = %e, "Announcement failed to scan");
                outcome.stats.record_error();
            }
        }
    }

    outcome
}

// ═══════════════════════════════════════════════════════════════════════════════
// SUMMARY
// ═══════════════════════════════════════════════════════════════════════════════

/// Scan result summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of announcements scanned
    pub total_scanned: u64,
    /// Number rejected by view tag alone
    pub view_tag_skipped: u64,
    /// Number of payments discovered
    pub discoveries: u64,
    /// Number of errors
    pub errors: u64,
    /// Number excluded by the view tag filter
    pub filtered: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Scan rate (announcements per second)
    pub rate: f64,
    /// Filter efficiency (% filtered by view tag)
    pub filter_efficiency: f64,
}

impl From<ScanStats> for ScanSummary {
    fn from(stats: ScanStats) -> Self {
        Self {
            total_scanned: stats.total_scanned,
            view_tag_skipped: stats.view_tag_skipped,
            discoveries: stats.discoveries,
            errors: stats.errors,
            filtered: stats.filtered,
            duration_ms: stats.duration_ms,
            rate: stats.rate(),
            filter_efficiency: stats.filter_efficiency(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use shroud_stealth::generate_stealth_address_with_rng;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Announcements with ids `0..total`; every `every`-th one is addressed to `keys`.
    fn feed(seed: u64, total: u64, every: u64) -> (StealthKeys, Vec<Announcement>) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let keys = StealthKeys::generate_with_rng(&mut rng).unwrap();
        let other = StealthKeys::generate_with_rng(&mut rng).unwrap();

        let announcements = (0..total)
            .map(|id| {
                let target = if id % every == 0 { &keys } else { &other };
                generate_stealth_address_with_rng(target.meta_address(), &mut rng)
                    .unwrap()
                    .to_announcement()
                    .with_id(id)
            })
            .collect();

        (keys, announcements)
    }

    fn ids(found: &[DiscoveredPayment]) -> Vec<u64> {
        found.iter().map(|p| p.announcement.id).collect()
    }

    #[test]
    fn test_scan_empty() {
        let (keys, _) = feed(1, 0, 1);
        let scanner = Scanner::new(keys);
        assert!(scanner.scan(&[]).is_empty());
        assert_eq!(scanner.stats().total_scanned, 0);
    }

    #[test]
    fn test_scan_finds_payments_in_order() {
        init_tracing();
        let (keys, announcements) = feed(2, 30, 7);
        let scanner = Scanner::with_config(keys, ScannerConfig::new().batch_size(4)).unwrap();

        let found = scanner.scan(&announcements);
        assert_eq!(ids(&found), vec![0, 7, 14, 21, 28]);

        let stats = scanner.stats();
        assert_eq!(stats.total_scanned, 30);
        assert_eq!(stats.discoveries, 5);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_scan_stop_on_first() {
        let (keys, announcements) = feed(3, 20, 3);
        let config = ScannerConfig::new().batch_size(5).stop_on_first();
        let scanner = Scanner::with_config(keys, config).unwrap();

        assert_eq!(ids(&scanner.scan(&announcements)), vec![0]);
        assert_eq!(
            scanner.position(),
            ScanPosition {
                last_id: Some(0),
                total_scanned: 1,
                total_discoveries: 1,
            }
        );
    }

    #[test]
    fn test_scan_without_view_tags_does_full_checks() {
        let (keys, announcements) = feed(4, 12, 4);
        let scanner = Scanner::with_config(keys, ScannerConfig::new().without_view_tags()).unwrap();

        let found = scanner.scan(&announcements);
        assert_eq!(ids(&found), vec![0, 4, 8]);

        let stats = scanner.stats();
        assert_eq!(stats.view_tag_skipped, 0);
        assert_eq!(stats.full_checks, 12);
    }

    #[test]
    fn test_scan_view_tag_filter() {
        let (keys, announcements) = feed(5, 10, 2);
        let ours = announcements[4].view_tag.unwrap();

        let excluded = announcements
            .iter()
            .filter(|a| a.view_tag != Some(ours))
            .count() as u64;

        let config = ScannerConfig::new().batch_size(4).view_tags(vec![ours]);
        let scanner = Scanner::with_config(keys, config).unwrap();

        let updates = Arc::new(RwLock::new(Vec::new()));
        let updates_clone = Arc::clone(&updates);
        let callback: ProgressCallback = Box::new(move |progress| {
            updates_clone.write().push(progress);
        });
        let found = scanner.scan_with_progress(&announcements, callback);

        assert!(ids(&found).contains(&4));
        assert!(found.iter().all(|p| p.announcement.view_tag == Some(ours)));

        let stats = scanner.stats();
        assert_eq!(stats.total_scanned, 10);
        assert_eq!(stats.filtered, excluded);
        assert_eq!(scanner.position().last_id, Some(9));

        let updates = updates.read();
        let last = updates.last().unwrap();
        assert_eq!(last.scanned, 10);
        assert!((last.percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scan_position_tracking() {
        let (keys, announcements) = feed(6, 9, 3);
        let scanner = Scanner::with_config(keys, ScannerConfig::new().batch_size(2)).unwrap();
        scanner.scan(&announcements);

        let pos = scanner.position();
        assert_eq!(pos.last_id, Some(8));
        assert_eq!(pos.total_scanned, 9);
        assert_eq!(pos.total_discoveries, 3);

        scanner.reset_position();
        assert_eq!(scanner.position(), ScanPosition::new());
        assert_eq!(scanner.stats().total_scanned, 0);
    }

    #[test]
    fn test_scan_progress_callback() {
        let (keys, announcements) = feed(7, 25, 5);
        let scanner = Scanner::with_config(keys, ScannerConfig::new().batch_size(10)).unwrap();

        let updates = Arc::new(RwLock::new(Vec::new()));
        let updates_clone = Arc::clone(&updates);
        let callback: ProgressCallback = Box::new(move |progress| {
            updates_clone.write().push(progress);
        });

        scanner.scan_with_progress(&announcements, callback);

        let updates = updates.read();
        assert_eq!(updates.len(), 3);
        let last = updates.last().unwrap();
        assert_eq!(last.scanned, 25);
        assert_eq!(last.discoveries, 5);
        assert!(last.percent >= 99.0);
    }

    #[test]
    fn test_scan_one() {
        let (keys, announcements) = feed(8, 2, 2);
        let scanner = Scanner::new(keys);

        assert!(scanner.scan_one(&announcements[0]).unwrap().is_discovered());
        assert!(!scanner.scan_one(&announcements[1]).unwrap().is_discovered());
        assert_eq!(scanner.stats().total_scanned, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (keys, _) = feed(9, 0, 1);
        assert!(matches!(
            Scanner::with_config(keys, ScannerConfig::new().batch_size(0)),
            Err(StealthError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_scan_concurrent_matches_sequential() {
        init_tracing();
        let (keys, announcements) = feed(10, 40, 6);
        let config = ScannerConfig::new().batch_size(3).concurrency(4);
        let scanner = Scanner::with_config(keys, config).unwrap();

        let sequential = ids(&scanner.scan(&announcements));
        scanner.reset_position();
        let concurrent = ids(&scanner.scan_concurrent(announcements).await.unwrap());

        assert_eq!(concurrent, sequential);
        assert_eq!(concurrent, vec![0, 6, 12, 18, 24, 30, 36]);
        assert_eq!(scanner.stats().total_scanned, 40);
        assert_eq!(scanner.position().last_id, Some(39));
    }

    #[tokio::test]
    async fn test_scan_concurrent_stop_on_first() {
        let (keys, announcements) = feed(11, 16, 4);
        let config = ScannerConfig::new().batch_size(2).stop_on_first();
        let scanner = Scanner::with_config(keys, config).unwrap();

        let found = scanner.scan_concurrent(announcements).await.unwrap();
        assert_eq!(ids(&found), vec![0]);
        assert_eq!(
            scanner.position(),
            ScanPosition {
                last_id: Some(0),
                total_scanned: 1,
                total_discoveries: 1,
            }
        );
        assert_eq!(scanner.stats().discoveries, 1);
    }

    #[tokio::test]
    async fn test_scan_concurrent_stop_on_first_resumes_without_loss() {
        let (keys, announcements) = feed(14, 16, 4);
        let config = ScannerConfig::new().batch_size(3).concurrency(3).stop_on_first();
        let scanner = Scanner::with_config(keys, config).unwrap();

        let mut remaining = announcements;
        let mut found = Vec::new();
        while !remaining.is_empty() {
            let batch = scanner.scan_concurrent(remaining.clone()).await.unwrap();
            found.extend(ids(&batch));

            let resume_after = scanner.position().last_id;
            remaining.retain(|a| Some(a.id) > resume_after);
            if batch.is_empty() {
                break;
            }
        }

        assert_eq!(found, vec![0, 4, 8, 12]);
        assert_eq!(scanner.position().total_discoveries, 4);
    }

    #[tokio::test]
    async fn test_scan_concurrent_empty() {
        let (keys, _) = feed(12, 0, 1);
        let scanner = Scanner::new(keys);
        assert!(scanner.scan_concurrent(Vec::new()).await.unwrap().is_empty());
    }

    #[test]
    fn test_scan_progress_eta() {
        let mut progress = ScanProgress::new(1000);

        // 500 scanned in 1000ms (500/s rate)
        progress.update(500, 2, 1000);

        assert!((progress.percent - 50.0).abs() < 0.1);
        assert!((progress.rate - 500.0).abs() < 1.0);
        assert!((progress.eta_seconds.unwrap() - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_summary_from_stats() {
        let (keys, announcements) = feed(13, 8, 4);
        let scanner = Scanner::new(keys);
        scanner.scan(&announcements);

        let summary = ScanSummary::from(scanner.stats());
        assert_eq!(summary.total_scanned, 8);
        assert_eq!(summary.discoveries, 2);
        assert!(summary.filter_efficiency <= 100.0);
    }
}
