//! Restart governor: decides whether a crashed worker slot comes back.

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    /// Start a fresh session; `attempt` counts from 1.
    Restart { attempt: u32 },
    Retire,
}

/// Tracks crash counts per slot against a fixed restart budget.
#[derive(Debug)]
pub struct RestartGovernor {
    restarts: Vec<AtomicU32>,
    max_restarts: u32,
}

impl RestartGovernor {
    pub fn new(slots: usize, max_restarts: u32) -> Self {
        Self {
            restarts: (0..slots).map(|_| AtomicU32::new(0)).collect(),
            max_restarts,
        }
    }

    /// Record a crash of `slot` and decide what happens next.
    pub fn on_crash(&self, slot: usize) -> RestartDecision {
        let Some(counter) = self.restarts.get(slot) else {
            return RestartDecision::Retire;
        };
        let previous = counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_restarts).then_some(n + 1)
            });
        match previous {
            Ok(n) => RestartDecision::Restart { attempt: n + 1 },
            Err(_) => RestartDecision::Retire,
        }
    }

    /// Restarts used by `slot` so far.
    pub fn restarts(&self, slot: usize) -> u32 {
        self.restarts
            .get(slot)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn max_restarts(&self) -> u32 {
        self.max_restarts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_then_retire() {
        let governor = RestartGovernor::new(2, 2);
        assert_eq!(governor.on_crash(0), RestartDecision::Restart { attempt: 1 });
        assert_eq!(governor.on_crash(0), RestartDecision::Restart { attempt: 2 });
        assert_eq!(governor.on_crash(0), RestartDecision::Retire);
        assert_eq!(governor.on_crash(0), RestartDecision::Retire);
        assert_eq!(governor.restarts(0), 2);

        // Slots are independent.
        assert_eq!(governor.on_crash(1), RestartDecision::Restart { attempt: 1 });
        assert_eq!(governor.restarts(1), 1);
    }

    #[test]
    fn test_zero_budget_and_unknown_slot() {
        let governor = RestartGovernor::new(1, 0);
        assert_eq!(governor.on_crash(0), RestartDecision::Retire);
        assert_eq!(governor.on_crash(5), RestartDecision::Retire);
        assert_eq!(governor.restarts(5), 0);
    }
}
