//! Run telemetry: counters, per-worker status, headlines and the score.
//!
//! Workers never touch the privacy score directly. They send
//! [`DiversityEvent`]s to one aggregator task, which owns the
//! [`PrivacyScoreState`] and publishes each new breakdown on a watch
//! channel. Everything else here is plain shared state for the display.

pub mod score;

pub use score::{PrivacyScoreState, ScoreBreakdown, Visit};

use crate::config::ScoreConfig;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Something a worker did that changes diversity.
#[derive(Debug, Clone, PartialEq)]
pub enum DiversityEvent {
    Visit(Visit),
}

/// Sending half handed to every worker.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<DiversityEvent>,
}

impl EventSink {
    /// Best-effort; a closed aggregator drops the event.
    pub fn send(&self, event: DiversityEvent) {
        let _ = self.tx.send(event);
    }

    pub fn visit(&self, visit: Visit) {
        self.send(DiversityEvent::Visit(visit));
    }
}

/// The single aggregation point for the privacy score.
pub struct Aggregator;

impl Aggregator {
    /// Start the aggregator task.
    ///
    /// The task ends once every [`EventSink`] clone is dropped and returns
    /// the final state.
    pub fn spawn(
        config: ScoreConfig,
    ) -> (
        EventSink,
        watch::Receiver<ScoreBreakdown>,
        JoinHandle<PrivacyScoreState>,
    ) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (score_tx, score_rx) = watch::channel(ScoreBreakdown::default());
        let handle = tokio::spawn(async move {
            let mut state = PrivacyScoreState::new(config);
            while let Some(event) = rx.recv().await {
                match event {
                    DiversityEvent::Visit(visit) => state.record(visit),
                }
                let _ = score_tx.send(state.breakdown());
            }
            state
        });
        (EventSink { tx }, score_rx, handle)
    }
}

/// What one worker slot is doing right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkerStatus {
    pub worker: usize,
    pub category: Option<String>,
    pub pattern: Option<String>,
    pub issue: Option<String>,
    pub frustration: u32,
    pub requests: u64,
    pub restarts: u32,
    pub retired: bool,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    errors: AtomicU64,
    decoys: AtomicU64,
    issue_sessions: AtomicU64,
    chains: AtomicU64,
    crashes: AtomicU64,
    retired: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CounterSnapshot {
    pub requests: u64,
    pub errors: u64,
    pub decoys: u64,
    pub issue_sessions: u64,
    pub chains: u64,
    pub crashes: u64,
    pub retired: u64,
}

/// Point-in-time view for the status line or `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub elapsed_secs: u64,
    pub score: ScoreBreakdown,
    pub counters: CounterSnapshot,
    pub workers: Vec<WorkerStatus>,
    pub headlines: Vec<String>,
}

/// Totals reported when a run ends.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub elapsed_secs: u64,
    pub counters: CounterSnapshot,
    pub score: ScoreBreakdown,
    pub visits: u64,
    pub distinct_categories: usize,
    pub distinct_fingerprints: usize,
}

/// Shared run state read by the display.
#[derive(Debug)]
pub struct Telemetry {
    started: Instant,
    counters: Counters,
    workers: DashMap<usize, WorkerStatus>,
    headlines: Mutex<VecDeque<String>>,
    max_headlines: usize,
    score: watch::Receiver<ScoreBreakdown>,
}

impl Telemetry {
    pub fn new(max_headlines: usize, score: watch::Receiver<ScoreBreakdown>) -> Arc<Self> {
        Arc::new(Self {
            started: Instant::now(),
            counters: Counters::default(),
            workers: DashMap::new(),
            headlines: Mutex::new(VecDeque::with_capacity(max_headlines)),
            max_headlines,
            score,
        })
    }

    pub fn record_request(&self, decoyed: bool) {
        self.counters.requests.fetch_add(1, Ordering::Relaxed);
        if decoyed {
            self.counters.decoys.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_error(&self) {
        self.counters.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_issue_session(&self) {
        self.counters.issue_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_chain(&self) {
        self.counters.chains.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_crash(&self, worker: usize) {
        self.counters.crashes.fetch_add(1, Ordering::Relaxed);
        self.workers
            .entry(worker)
            .or_insert_with(|| WorkerStatus {
                worker,
                ..Default::default()
            })
            .restarts += 1;
    }

    /// Clear what the previous session of `worker` was doing. Lifetime
    /// fields (requests, restarts, retired) are kept.
    pub fn begin_session(&self, worker: usize) {
        self.update_worker(worker, |w| {
            w.category = None;
            w.pattern = None;
            w.issue = None;
            w.frustration = 0;
        });
    }

    pub fn record_retired(&self, worker: usize) {
        self.counters.retired.fetch_add(1, Ordering::Relaxed);
        if let Some(mut status) = self.workers.get_mut(&worker) {
            status.retired = true;
        }
    }

    /// Apply `f` to a worker's status, creating it if needed.
    pub fn update_worker(&self, worker: usize, f: impl FnOnce(&mut WorkerStatus)) {
        let mut entry = self.workers.entry(worker).or_insert_with(|| WorkerStatus {
            worker,
            ..Default::default()
        });
        f(entry.value_mut());
    }

    /// Keep a headline, dropping the oldest past `max_headlines`.
    pub fn push_headline(&self, headline: String) {
        if self.max_headlines == 0 {
            return;
        }
        let Ok(mut headlines) = self.headlines.lock() else {
            return;
        };
        if headlines.iter().any(|h| *h == headline) {
            return;
        }
        while headlines.len() >= self.max_headlines {
            headlines.pop_front();
        }
        headlines.push_back(headline);
    }

    pub fn headlines(&self) -> Vec<String> {
        self.headlines
            .lock()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn score(&self) -> ScoreBreakdown {
        *self.score.borrow()
    }

    /// Receiver that changes whenever the score does.
    pub fn subscribe(&self) -> watch::Receiver<ScoreBreakdown> {
        self.score.clone()
    }

    pub fn counters(&self) -> CounterSnapshot {
        let c = &self.counters;
        CounterSnapshot {
            requests: c.requests.load(Ordering::Relaxed),
            errors: c.errors.load(Ordering::Relaxed),
            decoys: c.decoys.load(Ordering::Relaxed),
            issue_sessions: c.issue_sessions.load(Ordering::Relaxed),
            chains: c.chains.load(Ordering::Relaxed),
            crashes: c.crashes.load(Ordering::Relaxed),
            retired: c.retired.load(Ordering::Relaxed),
        }
    }

    pub fn workers(&self) -> Vec<WorkerStatus> {
        let mut workers: Vec<WorkerStatus> =
            self.workers.iter().map(|e| e.value().clone()).collect();
        workers.sort_by_key(|w| w.worker);
        workers
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elapsed_secs: self.elapsed_secs(),
            score: self.score(),
            counters: self.counters(),
            workers: self.workers(),
            headlines: self.headlines(),
        }
    }

    /// Close out a run with the aggregator's final state.
    pub fn summary(&self, final_state: &PrivacyScoreState) -> RunSummary {
        RunSummary {
            elapsed_secs: self.elapsed_secs(),
            counters: self.counters(),
            score: final_state.breakdown(),
            visits: final_state.recorded(),
            distinct_categories: final_state.distinct_categories(),
            distinct_fingerprints: final_state.distinct_fingerprints(),
        }
    }
}
