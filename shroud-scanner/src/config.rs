//! Scanner configuration.
//!
//! Built either with the builder methods or from the environment:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `SHROUD_SCAN_BATCH_SIZE` | `batch_size` | 1000 |
//! | `SHROUD_SCAN_CONCURRENCY` | `concurrency` | 4 |
//! | `SHROUD_SCAN_VIEW_TAGS` | `use_view_tags` | true |
//! | `SHROUD_SCAN_STOP_ON_FIRST` | `stop_on_first` | false |

use shroud_core::constants::{DEFAULT_SCAN_BATCH_SIZE, DEFAULT_SCAN_CONCURRENCY, MAX_SCAN_BATCH_SIZE};
use shroud_core::error::{Result, StealthError};

/// Environment variable for [`ScannerConfig::batch_size`].
pub const ENV_BATCH_SIZE: &str = "SHROUD_SCAN_BATCH_SIZE";
/// Environment variable for [`ScannerConfig::concurrency`].
pub const ENV_CONCURRENCY: &str = "SHROUD_SCAN_CONCURRENCY";
/// Environment variable for [`ScannerConfig::use_view_tags`].
pub const ENV_VIEW_TAGS: &str = "SHROUD_SCAN_VIEW_TAGS";
/// Environment variable for [`ScannerConfig::stop_on_first`].
pub const ENV_STOP_ON_FIRST: &str = "SHROUD_SCAN_STOP_ON_FIRST";

/// Scanner configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Announcements per batch (one blocking task per batch when concurrent)
    pub batch_size: usize,
    /// Whether to stop on first discovery
    pub stop_on_first: bool,
    /// Only scan tagged announcements carrying one of these view tags (None = all).
    /// Untagged announcements are always scanned.
    pub view_tag_filter: Option<Vec<u8>>,
    /// Use published view tags to skip the full address check
    pub use_view_tags: bool,
    /// Maximum batches scanned at the same time by `scan_concurrent`
    pub concurrency: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_SCAN_BATCH_SIZE,
            stop_on_first: false,
            view_tag_filter: None,
            use_view_tags: true,
            concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }
}

impl ScannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the process environment (and `.env`, if present).
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BATCH_SIZE) {
            config.batch_size = parse_usize(ENV_BATCH_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_CONCURRENCY) {
            config.concurrency = parse_usize(ENV_CONCURRENCY, &value)?;
        }
        if let Some(value) = lookup(ENV_VIEW_TAGS) {
            config.use_view_tags = parse_flag(&value);
        }
        if let Some(value) = lookup(ENV_STOP_ON_FIRST) {
            config.stop_on_first = parse_flag(&value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Enables stopping on first discovery.
    pub fn stop_on_first(mut self) -> Self {
        self.stop_on_first = true;
        self
    }

    /// Sets specific view tags to scan.
    pub fn view_tags(mut self, tags: Vec<u8>) -> Self {
        self.view_tag_filter = Some(tags);
        self
    }

    /// Disables the view tag fast path; every announcement gets the full check.
    pub fn without_view_tags(mut self) -> Self {
        self.use_view_tags = false;
        self
    }

    /// Sets the number of batches scanned at the same time.
    pub fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers;
        self
    }

    /// Checks the configuration for values the scanner cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(StealthError::Config("batch_size must be at least 1".into()));
        }
        if self.batch_size > MAX_SCAN_BATCH_SIZE {
            return Err(StealthError::Config(format!(
                "batch_size {} exceeds maximum {}",
                self.batch_size, MAX_SCAN_BATCH_SIZE
            )));
        }
        if self.concurrency == 0 {
            return Err(StealthError::Config("concurrency must be at least 1".into()));
        }
        Ok(())
    }

    /// Returns whether an announcement with `view_tag` passes the tag filter.
    pub(crate) fn accepts(&self, view_tag: Option<u8>) -> bool {
        match (&self.view_tag_filter, view_tag) {
            (Some(tags), Some(tag)) => tags.contains(&tag),
            _ => true,
        }
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| StealthError::Config(format!("{key}: expected a positive integer, got {value:?}")))
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value != "false" && value != "0"
}
