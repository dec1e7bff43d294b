//! Delay pacing between requests.
//!
//! A [`Pacer`] turns a [`DelayRange`] into a concrete wait. With chaos on it
//! draws from the worker's logistic map, otherwise from a uniform RNG draw.

use super::chaos::{ChaosTimer, DelayRange};
use rand::Rng;
use std::time::Duration;

/// Probability of a browsing-pattern switch per iteration with chaos on.
pub const CHAOS_SWITCH_PROBABILITY: f64 = 0.15;
/// Same, with plain randomness.
pub const UNIFORM_SWITCH_PROBABILITY: f64 = 0.10;

/// Uniform delay inside `range`.
pub fn random_delay<R: Rng + ?Sized>(range: DelayRange, rng: &mut R) -> Duration {
    Duration::from_secs_f64(uniform_secs(range, rng))
}

fn uniform_secs<R: Rng + ?Sized>(range: DelayRange, rng: &mut R) -> f64 {
    if range.max_secs <= range.min_secs {
        return range.min_secs.max(0.0);
    }
    rng.gen_range(range.min_secs..=range.max_secs)
}

/// Per-worker delay source.
#[derive(Debug, Clone)]
pub struct Pacer {
    chaos: Option<ChaosTimer>,
}

impl Pacer {
    /// Pacer backed by a freshly seeded logistic map.
    pub fn chaotic<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            chaos: Some(ChaosTimer::from_rng(rng)),
        }
    }

    pub fn with_timer(timer: ChaosTimer) -> Self {
        Self { chaos: Some(timer) }
    }

    pub fn uniform() -> Self {
        Self { chaos: None }
    }

    pub fn new<R: Rng + ?Sized>(chaos: bool, rng: &mut R) -> Self {
        if chaos {
            Self::chaotic(rng)
        } else {
            Self::uniform()
        }
    }

    pub fn is_chaotic(&self) -> bool {
        self.chaos.is_some()
    }

    pub fn chaos(&self) -> Option<&ChaosTimer> {
        self.chaos.as_ref()
    }

    /// Draw a delay in seconds inside `range`.
    pub fn next_secs<R: Rng + ?Sized>(&mut self, range: DelayRange, rng: &mut R) -> f64 {
        match self.chaos.as_mut() {
            Some(timer) => timer.next_delay_secs(range),
            None => uniform_secs(range, rng),
        }
    }

    pub fn next_delay<R: Rng + ?Sized>(&mut self, range: DelayRange, rng: &mut R) -> Duration {
        Duration::from_secs_f64(self.next_secs(range, rng))
    }

    /// Whether the browsing pattern should change this iteration.
    pub fn should_switch<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.chaos.as_mut() {
            Some(timer) => timer.should_switch(CHAOS_SWITCH_PROBABILITY),
            None => rng.gen_bool(UNIFORM_SWITCH_PROBABILITY),
        }
    }
}
