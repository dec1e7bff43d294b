//! Browsing-pattern chain.
//!
//! A small Markov chain over pacing styles. Each style owns a delay range
//! used between ordinary category visits.

use super::chaos::DelayRange;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Delay range used for browsing when chaos timing is on.
pub const CHAOS_RANGE: DelayRange = DelayRange::new(1.0, 120.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowsingPattern {
    Normal,
    Bursty,
    Slow,
    Erratic,
}

impl BrowsingPattern {
    pub const ALL: [BrowsingPattern; 4] = [
        BrowsingPattern::Normal,
        BrowsingPattern::Bursty,
        BrowsingPattern::Slow,
        BrowsingPattern::Erratic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowsingPattern::Normal => "normal",
            BrowsingPattern::Bursty => "bursty",
            BrowsingPattern::Slow => "slow",
            BrowsingPattern::Erratic => "erratic",
        }
    }

    /// Outgoing transition weights, in `ALL` order.
    pub fn transitions(&self) -> [f64; 4] {
        match self {
            BrowsingPattern::Normal => [0.6, 0.15, 0.15, 0.1],
            BrowsingPattern::Bursty => [0.2, 0.5, 0.1, 0.2],
            BrowsingPattern::Slow => [0.3, 0.1, 0.5, 0.1],
            BrowsingPattern::Erratic => [0.15, 0.25, 0.1, 0.5],
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Take one step along the chain.
    pub fn next<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        match WeightedIndex::new(self.transitions()) {
            Ok(dist) => Self::ALL[dist.sample(rng)],
            Err(_) => *self,
        }
    }

    /// Delay range for one wait. Bursty alternates quick bursts with pauses.
    pub fn delay_range<R: Rng + ?Sized>(&self, rng: &mut R) -> DelayRange {
        match self {
            BrowsingPattern::Normal => DelayRange::new(5.0, 30.0),
            BrowsingPattern::Bursty => {
                if rng.gen_bool(0.7) {
                    DelayRange::new(1.0, 3.0)
                } else {
                    DelayRange::new(30.0, 90.0)
                }
            }
            BrowsingPattern::Slow => DelayRange::new(45.0, 180.0),
            BrowsingPattern::Erratic => DelayRange::new(1.0, 120.0),
        }
    }
}

impl std::fmt::Display for BrowsingPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
