//! Worker pool orchestrator.
//!
//! Owns the run: one supervisor task per worker slot, the privacy-score
//! aggregator, the optional duration timer and the stop signal. A worker
//! panic is contained to its slot; the supervisor starts a fresh session
//! until the restart budget runs out, then retires the slot.

use super::resource_governor::{RestartDecision, RestartGovernor};
use super::worker::{SessionWorker, StopHandle, WorkerContext};
use crate::acquisition::Fetcher;
use crate::audit::AuditLogger;
use crate::catalog::{Catalog, Persona};
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::pattern::MarkovModel;
use crate::telemetry::{Aggregator, RunSummary, Telemetry};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Counts a running worker; decrements on drop, panics included.
struct ActiveGuard {
    active: Arc<AtomicUsize>,
}

impl ActiveGuard {
    fn new(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self {
            active: Arc::clone(active),
        }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A configured, not yet started pool.
pub struct Orchestrator {
    config: EngineConfig,
    catalog: Catalog,
    model: MarkovModel,
    persona: Option<Persona>,
    fetcher: Arc<dyn Fetcher>,
}

impl Orchestrator {
    /// Validate `config` and narrow `catalog` to what the run will visit.
    pub fn new(
        config: EngineConfig,
        catalog: &Catalog,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let persona = config.persona_in(catalog)?.cloned();
        let catalog = catalog.restrict(&config.include, persona.as_ref());
        if catalog.categories().is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let model = MarkovModel::from_catalog(&catalog, config.persona_boost);

        Ok(Self {
            config,
            catalog,
            model,
            persona,
            fetcher,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Spawn every worker slot and return a handle to the running pool.
    pub fn start(self) -> Result<RunningPool> {
        let audit = match &self.config.audit_log {
            Some(path) => Some(Arc::new(Mutex::new(
                AuditLogger::open(path).context("opening audit log")?,
            ))),
            None => None,
        };

        let (events, score_rx, aggregator) = Aggregator::spawn(self.config.score.clone());
        let telemetry = Telemetry::new(self.config.max_headlines, score_rx);
        let stop = Arc::new(StopHandle::new());
        let active = Arc::new(AtomicUsize::new(0));
        let workers = self.config.workers;
        let duration_minutes = self.config.duration_minutes;
        let governor = Arc::new(RestartGovernor::new(workers, self.config.max_restarts));

        info!(
            "starting {workers} workers over {} categories (chaos {}, stealth {}, decoys {}, issues {})",
            self.catalog.categories().len(),
            self.config.chaos,
            self.config.stealth,
            self.config.decoys,
            self.config
                .issue_mode
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "off".into()),
        );

        let ctx = Arc::new(WorkerContext {
            config: self.config,
            catalog: self.catalog,
            model: self.model,
            persona: self.persona,
            fetcher: self.fetcher,
            telemetry: Arc::clone(&telemetry),
            events,
            audit,
        });

        let supervisors: Vec<JoinHandle<()>> = (0..workers)
            .map(|slot| {
                tokio::spawn(supervise(
                    slot,
                    Arc::clone(&ctx),
                    Arc::clone(&governor),
                    Arc::clone(&stop),
                    Arc::clone(&active),
                ))
            })
            .collect();
        // Supervisors hold the only remaining context references, so the
        // aggregator ends once they do.
        drop(ctx);

        let timer = (duration_minutes > 0).then(|| {
            let stop = Arc::clone(&stop);
            let mut signal = stop.signal();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(duration_minutes * 60)) => {
                        info!("run duration of {duration_minutes} min reached");
                        stop.stop();
                    }
                    _ = signal.stopped() => {}
                }
            })
        });

        let summary_telemetry = Arc::clone(&telemetry);
        let done_stop = Arc::clone(&stop);
        let task = tokio::spawn(async move {
            futures::future::join_all(supervisors).await;
            // Every slot may have retired without a stop request.
            done_stop.stop();
            if let Some(timer) = timer {
                let _ = timer.await;
            }
            let state = aggregator.await.context("score aggregator failed")?;
            let summary = summary_telemetry.summary(&state);
            info!(
                "run finished: {} requests, {} errors, score {:.1}",
                summary.counters.requests, summary.counters.errors, summary.score.total
            );
            Ok::<_, anyhow::Error>(summary)
        });

        Ok(RunningPool {
            telemetry,
            stop,
            active,
            task,
        })
    }

    /// Start and wait for the run to end.
    pub async fn run(self) -> Result<RunSummary> {
        self.start()?.wait().await
    }
}

/// Handle to a started pool.
pub struct RunningPool {
    telemetry: Arc<Telemetry>,
    stop: Arc<StopHandle>,
    active: Arc<AtomicUsize>,
    task: JoinHandle<Result<RunSummary>>,
}

impl RunningPool {
    pub fn telemetry(&self) -> Arc<Telemetry> {
        Arc::clone(&self.telemetry)
    }

    pub fn stop_handle(&self) -> Arc<StopHandle> {
        Arc::clone(&self.stop)
    }

    /// Ask every worker to finish its current request and exit.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Workers currently running a session.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn wait(self) -> Result<RunSummary> {
        self.task.await.context("orchestrator task failed")?
    }
}

async fn supervise(
    slot: usize,
    ctx: Arc<WorkerContext>,
    governor: Arc<RestartGovernor>,
    stop: Arc<StopHandle>,
    active: Arc<AtomicUsize>,
) {
    let mut generation = 0;
    while !stop.is_stopped() {
        ctx.telemetry.begin_session(slot);
        let worker = SessionWorker::new(slot, generation, Arc::clone(&ctx));
        let guard = ActiveGuard::new(&active);
        let result = tokio::spawn(worker.run(stop.signal())).await;
        drop(guard);

        match result {
            Ok(()) => break,
            Err(e) if e.is_panic() => {
                ctx.telemetry.record_crash(slot);
                match governor.on_crash(slot) {
                    RestartDecision::Restart { attempt } => {
                        warn!(
                            "worker {slot} crashed, restarting ({attempt}/{})",
                            governor.max_restarts()
                        );
                        generation = attempt;
                    }
                    RestartDecision::Retire => {
                        error!("worker {slot} crashed too often, retiring slot");
                        ctx.telemetry.record_retired(slot);
                        break;
                    }
                }
            }
            Err(e) => {
                warn!("worker {slot} cancelled: {e}");
                break;
            }
        }
    }
}
