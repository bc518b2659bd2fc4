//! View tags for fast announcement filtering.
//!
//! The view tag is the first byte of the hashed shared secret. A recipient who
//! recomputes the shared secret can reject ~255/256 of foreign announcements
//! after one point multiplication and one hash, skipping the point addition
//! and address hash entirely.
//!
//! ## Security
//!
//! A published tag reveals 8 of the 256 bits of the hashed secret. The scalar
//! tweak still has ~248 bits that an observer cannot predict, and the tag says
//! nothing about who the recipient is.

use subtle::ConstantTimeEq;

use shroud_core::constants::{KECCAK256_SIZE, VIEW_TAG_SPACE};

/// Returns the view tag for a hashed shared secret.
pub fn compute_view_tag(hashed_secret: &[u8; KECCAK256_SIZE]) -> u8 {
    hashed_secret[0]
}

/// Checks a published view tag against a hashed shared secret in constant time.
pub fn verify_view_tag(hashed_secret: &[u8; KECCAK256_SIZE], expected_tag: u8) -> bool {
    compute_view_tag(hashed_secret).ct_eq(&expected_tag).into()
}

/// View tag distribution over a set of announcements.
///
/// Useful for checking that a feed of announcements carries uniformly
/// distributed tags; a skewed feed filters worse than the nominal 255/256.
#[derive(Debug, Clone)]
pub struct ViewTagStats {
    /// Count of each view tag value
    pub distribution: Vec<u64>,
    /// Total number of tags analyzed
    pub total: u64,
}

impl Default for ViewTagStats {
    fn default() -> Self {
        Self {
            distribution: vec![0; VIEW_TAG_SPACE],
            total: 0,
        }
    }
}

impl ViewTagStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a view tag.
    pub fn add(&mut self, tag: u8) {
        self.distribution[tag as usize] += 1;
        self.total += 1;
    }

    /// Returns the most common view tag.
    pub fn most_common(&self) -> Option<(u8, u64)> {
        if self.total == 0 {
            return None;
        }

        self.distribution
            .iter()
            .enumerate()
            .max_by_key(|(_, &count)| count)
            .map(|(tag, &count)| (tag as u8, count))
    }

    /// Expected count per tag under a uniform distribution.
    pub fn expected_uniform_count(&self) -> f64 {
        self.total as f64 / VIEW_TAG_SPACE as f64
    }

    /// Fraction of announcements a recipient holding tag `tag` would skip.
    pub fn filter_rate_for(&self, tag: u8) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        1.0 - self.distribution[tag as usize] as f64 / self.total as f64
    }

    /// Computes the chi-squared statistic against a uniform distribution.
    pub fn chi_squared(&self) -> f64 {
        let expected = self.expected_uniform_count();
        if expected == 0.0 {
            return 0.0;
        }

        self.distribution
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                (diff * diff) / expected
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;
    use rand::RngCore;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_view_tag_is_first_byte() {
        let mut secret = [0u8; 32];
        secret[0] = 0xA1;
        secret[1] = 0xFF;
        assert_eq!(compute_view_tag(&secret), 0xA1);
    }

    #[test]
    fn test_verify_view_tag() {
        let secret = keccak256(b"shared point");
        let correct_tag = compute_view_tag(&secret);

        assert!(verify_view_tag(&secret, correct_tag));
        for delta in 1..=255u8 {
            assert!(!verify_view_tag(&secret, correct_tag.wrapping_add(delta)));
        }
    }

    #[test]
    fn test_view_tag_distribution() {
        let mut rng = ChaCha20Rng::seed_from_u64(5564);
        let mut stats = ViewTagStats::new();

        for _ in 0..10_000 {
            let mut point = [0u8; 33];
            rng.fill_bytes(&mut point);
            stats.add(compute_view_tag(&keccak256(&point)));
        }

        // 255 degrees of freedom; p=0.001 critical value is ~330
        let chi_sq = stats.chi_squared();
        assert!(chi_sq < 400.0, "view tags not uniform: chi2 = {}", chi_sq);
    }

    #[test]
    fn test_view_tag_stats() {
        let mut stats = ViewTagStats::new();
        assert!(stats.most_common().is_none());

        stats.add(0);
        stats.add(0);
        stats.add(1);
        stats.add(255);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.distribution[0], 2);
        assert_eq!(stats.distribution[255], 1);
        assert_eq!(stats.most_common(), Some((0, 2)));
        assert!((stats.filter_rate_for(0) - 0.5).abs() < f64::EPSILON);
        assert!((stats.filter_rate_for(7) - 1.0).abs() < f64::EPSILON);
    }
}
