//! Chaotic timing from the logistic map.
//!
//! `x' = r·x·(1−x)` with `r = 3.9` sits in the chaotic regime: the sequence
//! is fully determined by its seed but never settles into a short period,
//! and nearby seeds separate exponentially fast.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Growth constant of the logistic map.
pub const GROWTH: f64 = 3.9;

const GOLDEN: f64 = 0.618_033_988_749_894_9;

/// A step smaller than this counts as stuck on a fixed point.
const STALL_EPSILON: f64 = 1e-9;

/// A closed delay interval in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Whether the range is usable: finite, non-negative, `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min_secs.is_finite()
            && self.max_secs.is_finite()
            && self.min_secs >= 0.0
            && self.min_secs <= self.max_secs
    }

    /// Linear map of `unit` in [0,1] onto the range.
    pub fn scale(&self, unit: f64) -> f64 {
        self.min_secs + (self.max_secs - self.min_secs) * unit.clamp(0.0, 1.0)
    }

    /// Shrink the range by `factor` (0,1], keeping it anchored at zero.
    pub fn compressed(&self, factor: f64) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self::new(self.min_secs * f, self.max_secs * f)
    }

    pub fn contains(&self, secs: f64) -> bool {
        secs >= self.min_secs && secs <= self.max_secs
    }
}

/// Logistic-map generator. One per worker.
#[derive(Debug, Clone)]
pub struct ChaosTimer {
    x: f64,
    iteration: u64,
    nudges: u64,
}

impl ChaosTimer {
    /// Seed from a process-random value in the open interval (0,1).
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut seed: f64 = rng.gen();
        while seed <= 0.0 || seed >= 1.0 {
            seed = rng.gen();
        }
        Self::with_seed(seed)
    }

    /// Seed explicitly. A seed outside (0,1) is nudged inside.
    pub fn with_seed(seed: f64) -> Self {
        let mut timer = Self {
            x: seed,
            iteration: 0,
            nudges: 0,
        };
        if !Self::in_open_interval(seed) {
            debug!("degenerate chaos seed {seed}, nudging");
            timer.x = nudge(0);
            timer.nudges += 1;
        }
        timer
    }

    fn in_open_interval(x: f64) -> bool {
        x.is_finite() && x > 0.0 && x < 1.0
    }

    /// Current state value.
    pub fn state(&self) -> f64 {
        self.x
    }

    /// Number of draws so far.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// How many times the state had to be pushed off a fixed point.
    pub fn nudges(&self) -> u64 {
        self.nudges
    }

    /// Advance the map once and return the new state in (0,1).
    pub fn advance(&mut self) -> f64 {
        self.iteration += 1;
        let next = GROWTH * self.x * (1.0 - self.x);
        if Self::in_open_interval(next) && (next - self.x).abs() >= STALL_EPSILON {
            self.x = next;
        } else {
            self.x = nudge(self.iteration);
            self.nudges += 1;
        }
        self.x
    }

    /// Next delay in seconds, linearly scaled into `range`.
    pub fn next_delay_secs(&mut self, range: DelayRange) -> f64 {
        range.scale(self.advance())
    }

    pub fn next_delay(&mut self, range: DelayRange) -> Duration {
        Duration::from_secs_f64(self.next_delay_secs(range))
    }

    /// True with roughly probability `p`, driven by the map.
    pub fn should_switch(&mut self, p: f64) -> bool {
        self.advance() < p
    }
}

/// Deterministic re-entry point inside (0.05, 0.95).
fn nudge(iteration: u64) -> f64 {
    let frac = ((iteration as f64 + 1.0) * GOLDEN).fract();
    0.05 + 0.9 * frac
}
