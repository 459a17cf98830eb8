//! Score, multiplier and star count

use serde::{Deserialize, Serialize};

use crate::round_points;

/// Session score accumulators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEconomy {
    score: u64,
    multiplier: f32,
    stars: u32,
}

impl Default for ScoreEconomy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreEconomy {
    pub const MIN_MULTIPLIER: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            score: 0,
            multiplier: Self::MIN_MULTIPLIER,
            stars: 0,
        }
    }

    /// Add `round(base_points * multiplier)` and return the amount added
    pub fn add_score(&mut self, base_points: u32) -> u64 {
        let awarded = round_points(base_points as f32 * self.multiplier);
        self.score = self.score.saturating_add(awarded);
        log::debug!(
            "Score +{} ({} x {:.2}), total {}",
            awarded,
            base_points,
            self.multiplier,
            self.score
        );
        awarded
    }

    /// Replace the multiplier; values below 1.0 (or NaN) clamp to 1.0
    pub fn set_multiplier(&mut self, value: f32) {
        let clamped = if value.is_nan() {
            Self::MIN_MULTIPLIER
        } else {
            value.max(Self::MIN_MULTIPLIER)
        };
        if clamped != value {
            log::warn!("Multiplier {} out of range, clamped to {}", value, clamped);
        }
        self.multiplier = clamped;
    }

    pub fn add_stars(&mut self, count: u32) {
        self.stars = self.stars.saturating_add(count);
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_score_applies_multiplier() {
        let mut economy = ScoreEconomy::new();
        economy.set_multiplier(1.3);
        let before = economy.score();
        assert_eq!(economy.add_score(100), 130);
        assert_eq!(economy.score() - before, 130);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let mut economy = ScoreEconomy::new();
        economy.set_multiplier(1.5);
        // 75 * 1.5 = 112.5
        assert_eq!(economy.add_score(75), 113);
        assert_eq!(economy.add_score(1), 2);
    }

    #[test]
    fn test_multiplier_clamped() {
        let mut economy = ScoreEconomy::new();
        economy.set_multiplier(0.2);
        assert_eq!(economy.multiplier(), 1.0);
        economy.set_multiplier(f32::NAN);
        assert_eq!(economy.multiplier(), 1.0);
        economy.set_multiplier(2.4);
        assert_eq!(economy.multiplier(), 2.4);
    }

    #[test]
    fn test_stars_accumulate() {
        let mut economy = ScoreEconomy::new();
        economy.add_stars(1);
        economy.add_stars(5);
        assert_eq!(economy.stars(), 6);
    }

    proptest! {
        #[test]
        fn prop_score_monotonic(awards in prop::collection::vec((0u32..1000, 1.0f32..5.0), 0..30)) {
            let mut economy = ScoreEconomy::new();
            for (points, multiplier) in awards {
                economy.set_multiplier(multiplier);
                let before = economy.score();
                let added = economy.add_score(points);
                prop_assert_eq!(economy.score(), before + added);
                prop_assert!(economy.multiplier() >= 1.0);
            }
        }
    }
}
