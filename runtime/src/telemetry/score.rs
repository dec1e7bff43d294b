//! Privacy score over a sliding window of recent visits.
//!
//! Four sub-scores in `[0, 1]`, weighted and scaled to `[0, 100]`:
//! category spread, fingerprint spread, decoy coverage and issue noise.
//! The number is advisory; it describes the request stream, not what an
//! observer actually learns.

use crate::config::ScoreConfig;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// One visit as the score sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    /// Catalog category of a browse visit; `None` for issue steps, which
    /// only feed the issue sub-score.
    pub category: Option<String>,
    pub fingerprint: u64,
    pub decoyed: bool,
    pub issue: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub category: f64,
    pub fingerprint: f64,
    pub decoy: f64,
    pub issue: f64,
    /// Weighted total in `[0, 100]`.
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct PrivacyScoreState {
    config: ScoreConfig,
    window: VecDeque<Visit>,
    categories: HashMap<String, usize>,
    fingerprints: HashMap<u64, usize>,
    decoyed: usize,
    issues: usize,
    recorded: u64,
}

impl PrivacyScoreState {
    pub fn new(config: ScoreConfig) -> Self {
        let capacity = config.window.max(1);
        Self {
            config,
            window: VecDeque::with_capacity(capacity),
            categories: HashMap::new(),
            fingerprints: HashMap::new(),
            decoyed: 0,
            issues: 0,
            recorded: 0,
        }
    }

    /// Add a visit, evicting the oldest once the window is full.
    pub fn record(&mut self, visit: Visit) {
        if self.window.len() >= self.config.window.max(1) {
            if let Some(old) = self.window.pop_front() {
                self.forget(&old);
            }
        }
        if let Some(category) = &visit.category {
            *self.categories.entry(category.clone()).or_default() += 1;
        }
        *self.fingerprints.entry(visit.fingerprint).or_default() += 1;
        self.decoyed += usize::from(visit.decoyed);
        self.issues += usize::from(visit.issue);
        self.recorded += 1;
        self.window.push_back(visit);
    }

    fn forget(&mut self, visit: &Visit) {
        if let Some(category) = &visit.category {
            decrement(&mut self.categories, category);
        }
        decrement(&mut self.fingerprints, &visit.fingerprint);
        self.decoyed -= usize::from(visit.decoyed);
        self.issues -= usize::from(visit.issue);
    }

    /// Visits recorded over the whole run.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn distinct_categories(&self) -> usize {
        self.categories.len()
    }

    pub fn distinct_fingerprints(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        let n = self.window.len();
        if n == 0 {
            return ScoreBreakdown::default();
        }
        let cfg = &self.config;
        let category = ratio(self.categories.len() as f64, cfg.category_target as f64);
        let fingerprint = ratio(self.fingerprints.len() as f64, cfg.fingerprint_target as f64);
        let decoy = self.decoyed as f64 / n as f64;
        let issue_share = self.issues as f64 / n as f64;
        let issue = ratio(issue_share, cfg.issue_target_share);

        let w = &cfg.weights;
        let weight_sum = w.category + w.fingerprint + w.decoy + w.issue;
        let total = if weight_sum > 0.0 {
            100.0
                * (w.category * category
                    + w.fingerprint * fingerprint
                    + w.decoy * decoy
                    + w.issue * issue)
                / weight_sum
        } else {
            0.0
        };

        ScoreBreakdown {
            category,
            fingerprint,
            decoy,
            issue,
            total: total.clamp(0.0, 100.0),
        }
    }

    pub fn score(&self) -> f64 {
        self.breakdown().total
    }
}

fn ratio(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (value / target).clamp(0.0, 1.0)
}

fn decrement<K: std::hash::Hash + Eq + Clone>(counts: &mut HashMap<K, usize>, key: &K) {
    if let Some(count) = counts.get_mut(key) {
        *count -= 1;
        if *count == 0 {
            counts.remove(key);
        }
    }
}
