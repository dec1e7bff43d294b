//! Session worker: one simulated user.
//!
//! Every iteration picks a target (Markov click or issue step), dresses it
//! in the session fingerprint and decoy cookies, hands it to the fetcher
//! and waits a paced delay. All per-session state lives here and is
//! rebuilt from scratch when a slot restarts.

use crate::acquisition::{Fetcher, OutboundRequest, RequestOrigin};
use crate::audit::AuditLogger;
use crate::catalog::{Catalog, Persona};
use crate::config::EngineConfig;
use crate::issue::{IssueSession, StepOutcome};
use crate::pattern::{
    resolve_persona, BrowsingPattern, DayPart, DelayRange, MarkovModel, MarkovState, Pacer,
};
use crate::stealth::agents::REFERERS;
use crate::stealth::{DecoyBundle, DecoyInjector, Fingerprint};
use crate::telemetry::{EventSink, Telemetry, Visit};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn, Instrument};

/// Cooperative stop flag observed by every worker.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once stop is raised or the controller is gone.
    pub async fn stopped(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// Raising side of [`StopSignal`].
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only state shared by every worker of a run.
pub struct WorkerContext {
    pub config: EngineConfig,
    pub catalog: Catalog,
    pub model: MarkovModel,
    /// Persona from config, before any schedule blending.
    pub persona: Option<Persona>,
    pub fetcher: Arc<dyn Fetcher>,
    pub telemetry: Arc<Telemetry>,
    pub events: EventSink,
    pub audit: Option<Arc<Mutex<AuditLogger>>>,
}

/// One planned iteration.
#[derive(Debug, Clone)]
pub struct Plan {
    pub request: OutboundRequest,
    /// Delay after the request, already scaled by `time_scale`.
    pub delay: Duration,
}

pub struct SessionWorker {
    id: usize,
    generation: u32,
    ctx: Arc<WorkerContext>,
    rng: StdRng,
    fingerprint: Fingerprint,
    decoy: Option<DecoyBundle>,
    injector: DecoyInjector,
    markov: MarkovState,
    pattern: BrowsingPattern,
    pacer: Pacer,
    issue: Option<IssueSession>,
}

impl SessionWorker {
    /// Fresh session for slot `id`. `generation` counts restarts so a
    /// seeded run still gives a restarted slot new state.
    pub fn new(id: usize, generation: u32, ctx: Arc<WorkerContext>) -> Self {
        let mut rng = match ctx.config.seed {
            Some(seed) => StdRng::seed_from_u64(
                seed ^ ((id as u64) << 32) ^ (u64::from(generation) << 48),
            ),
            None => StdRng::from_entropy(),
        };

        let fingerprint = if ctx.config.stealth {
            Fingerprint::generate(&mut rng)
        } else {
            Fingerprint::baseline()
        };
        let (decoy, injector) = if ctx.config.decoys {
            (
                Some(DecoyBundle::generate(&mut rng)),
                DecoyInjector::new(ctx.config.decoy_rate),
            )
        } else {
            (None, DecoyInjector::disabled())
        };
        let start = ctx
            .catalog
            .random_category(&mut rng)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let pacer = Pacer::new(ctx.config.chaos, &mut rng);
        let pattern = BrowsingPattern::random(&mut rng);

        Self {
            id,
            generation,
            ctx,
            rng,
            fingerprint,
            decoy,
            injector,
            markov: MarkovState::new(&start),
            pattern,
            pacer,
            issue: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn issue(&self) -> Option<&IssueSession> {
        self.issue.as_ref()
    }

    pub fn pattern(&self) -> BrowsingPattern {
        self.pattern
    }

    pub fn current_category(&self) -> &str {
        &self.markov.current
    }

    /// Decide the next request and the wait after it.
    pub fn plan(&mut self, now: Instant) -> Option<Plan> {
        let ctx = Arc::clone(&self.ctx);
        let (url, origin, range) = match self.plan_issue(now) {
            Some(issue_plan) => issue_plan,
            None => self.plan_browse()?,
        };

        let referer = if ctx.config.stealth {
            REFERERS.choose(&mut self.rng).copied()
        } else {
            None
        };
        let mut request =
            OutboundRequest::new(self.id, &url, &self.fingerprint, origin).with_referer(referer);
        if let Some(bundle) = &self.decoy {
            if let Some(cookies) = self.injector.inject(bundle, &mut self.rng) {
                request = request.with_cookies(cookies);
            }
        }

        let secs = self.pacer.next_secs(range, &mut self.rng);
        let delay = Duration::from_secs_f64((secs * ctx.config.timing.time_scale).max(0.0));
        Some(Plan { request, delay })
    }

    fn plan_issue(&mut self, now: Instant) -> Option<(String, RequestOrigin, DelayRange)> {
        let ctx = Arc::clone(&self.ctx);
        let selector = ctx.config.issue_mode?;

        if self.issue.is_none() && self.rng.gen_bool(ctx.config.issue.issue_share) {
            let session = IssueSession::start(&selector, &ctx.config.issue, now, &mut self.rng);
            info!(
                "worker {} opened issue session {} ({})",
                self.id,
                session.id(),
                session.issue()
            );
            ctx.telemetry.record_issue_session();
            self.issue = Some(session);
        }

        let session = self.issue.as_mut()?;
        let StepOutcome {
            request,
            chained,
            concluded,
        } = session.step(now, &ctx.config.issue, &mut self.rng);
        let range = session.delay_range();
        let frustration = session.frustration();
        let current = session.issue();

        if let Some(chain) = chained {
            info!(
                "worker {} issue chained {} -> {} (depth {})",
                self.id, chain.from, chain.to, chain.depth
            );
            ctx.telemetry.record_chain();
        }
        if let Some(reason) = concluded {
            debug!("worker {} issue session ended: {reason:?}", self.id);
            self.issue = None;
        }
        ctx.telemetry.update_worker(self.id, |w| {
            w.issue = self.issue.as_ref().map(|_| current.to_string());
            w.frustration = if self.issue.is_some() { frustration } else { 0 };
        });

        let request = request?;
        let origin = RequestOrigin::Issue {
            issue: request.issue,
            label: request.label(),
            query: request.query.clone(),
        };
        Some((request.url, origin, range))
    }

    fn plan_browse(&mut self) -> Option<(String, RequestOrigin, DelayRange)> {
        let ctx = Arc::clone(&self.ctx);
        let persona = resolve_persona(
            &ctx.catalog,
            ctx.persona.as_ref(),
            ctx.config.scheduled,
            DayPart::now(),
        );

        if self.pacer.should_switch(&mut self.rng) {
            let next = self.pattern.next(&mut self.rng);
            if next != self.pattern {
                debug!("worker {} pattern {} -> {}", self.id, self.pattern, next);
            }
            self.pattern = next;
        }

        let category = self
            .markov
            .step(&ctx.model, persona.as_ref(), &mut self.rng)
            .to_string();
        let url = ctx.catalog.pick_url(&category, &mut self.rng)?.to_string();
        let range = if ctx.config.chaos {
            ctx.config.timing.chaos_range
        } else {
            self.pattern.delay_range(&mut self.rng)
        };

        let pattern = self.pattern;
        ctx.telemetry.update_worker(self.id, |w| {
            w.category = Some(category.clone());
            w.pattern = Some(pattern.to_string());
        });
        Some((url, RequestOrigin::Browse { category }, range))
    }

    /// Report a planned request to telemetry and the aggregator.
    fn record(&self, request: &OutboundRequest) {
        let ctx = &self.ctx;
        ctx.telemetry.record_request(request.is_decoyed());
        ctx.telemetry.update_worker(self.id, |w| w.requests += 1);
        ctx.events.visit(Visit {
            category: request.origin.category().map(String::from),
            fingerprint: self.fingerprint.id,
            decoyed: request.is_decoyed(),
            issue: request.origin.is_issue(),
        });
    }

    async fn fetch(&self, request: &OutboundRequest) {
        let ctx = &self.ctx;
        let started = std::time::Instant::now();
        let result = ctx.fetcher.fetch(request).await;
        let elapsed = started.elapsed().as_millis() as u64;

        let status = match result {
            Ok(outcome) => {
                if let (Some(headline), false) = (outcome.headline, request.origin.is_issue()) {
                    ctx.telemetry.push_headline(headline);
                }
                "ok".to_string()
            }
            Err(e) => {
                warn!("worker {} fetch failed: {e}", self.id);
                ctx.telemetry.record_error();
                format!("error: {e}")
            }
        };

        if let Some(audit) = &ctx.audit {
            if let Ok(mut logger) = audit.lock() {
                if let Err(e) = logger.log_request(request, elapsed, &status) {
                    warn!("audit log write failed: {e}");
                }
            }
        }
    }

    /// Run until `stop` is raised.
    pub async fn run(mut self, mut stop: StopSignal) {
        let span = tracing::info_span!("worker", id = self.id, generation = self.generation);
        async move {
            info!(
                "session started: fingerprint {:016x}, pattern {}, chaos {}",
                self.fingerprint.id,
                self.pattern,
                self.pacer.is_chaotic()
            );
            while !stop.is_stopped() {
                let Some(plan) = self.plan(Instant::now()) else {
                    warn!("worker {} has nothing to visit", self.id);
                    break;
                };
                self.record(&plan.request);
                self.fetch(&plan.request).await;

                tokio::select! {
                    _ = tokio::time::sleep(plan.delay) => {}
                    _ = stop.stopped() => break,
                }
            }
            info!("session ended after {} clicks", self.markov.clicks);
        }
        .instrument(span)
        .await
    }
}
