//! End-to-end scenarios across the engine.

use async_trait::async_trait;
use chaff_runtime::acquisition::{DryRunFetcher, FetchOutcome, Fetcher, OutboundRequest};
use chaff_runtime::catalog::{Catalog, ContentFilter, Persona};
use chaff_runtime::config::EngineConfig;
use chaff_runtime::error::FetchError;
use chaff_runtime::issue::query::classify;
use chaff_runtime::issue::{pattern, FrustrationTier, FrustrationTiers, IssueSession, IssueType};
use chaff_runtime::pattern::{
    ChaosTimer, DelayRange, MarkovModel, MarkovState, DEFAULT_PERSONA_BOOST,
};
use chaff_runtime::pool::Orchestrator;
use chaff_runtime::stealth::{DeviceClass, Fingerprint};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn fast_config(workers: usize) -> EngineConfig {
    let mut config = EngineConfig {
        workers,
        seed: Some(77),
        max_restarts: 2,
        ..Default::default()
    };
    config.timing.time_scale = 0.0001;
    config
}

#[test]
fn scenario_a_chaos_first_delay() {
    let mut timer = ChaosTimer::with_seed(0.5);
    let delay = timer.next_delay_secs(DelayRange::new(1.0, 5.0));
    assert!((delay - (1.0 + 4.0 * 0.975)).abs() < 1e-12, "{delay}");
    assert!((timer.state() - 0.975).abs() < 1e-12);

    let mut again = ChaosTimer::with_seed(0.5);
    for _ in 0..50 {
        assert_eq!(
            timer.next_delay_secs(DelayRange::new(1.0, 5.0)),
            again.next_delay_secs(DelayRange::new(1.0, 5.0))
        );
    }
}

#[test]
fn scenario_b_wifi_frustration_tiers() {
    let tiers = FrustrationTiers::default();
    let mut rng = StdRng::seed_from_u64(5);
    let start = tokio::time::Instant::now();

    let calm =
        IssueSession::new(IssueType::Wifi, start, Duration::from_secs(600)).with_frustration(1);
    for _ in 0..20 {
        let q = calm.search_query(&tiers, &mut rng);
        assert!(pattern(IssueType::Wifi).queries.contains(&q.as_str()), "{q}");
        assert_eq!(classify(&q), FrustrationTier::Calm);
    }

    let frantic =
        IssueSession::new(IssueType::Wifi, start, Duration::from_secs(600)).with_frustration(12);
    for _ in 0..20 {
        let q = frantic.search_query(&tiers, &mut rng);
        assert!(q.starts_with("HELP "), "{q}");
        assert_eq!(classify(&q), FrustrationTier::Frantic);
    }

    assert_eq!(tiers.tier(8), FrustrationTier::Desperate);
}

#[test]
fn scenario_c_persona_bias() {
    let catalog = Catalog::builtin();
    let persona = Persona::new("tech_privacy", "", &["Technology", "Privacy"]);
    let active = catalog.restrict(&ContentFilter::default(), Some(&persona));
    let model = MarkovModel::from_catalog(&active, DEFAULT_PERSONA_BOOST);

    let mut rng = StdRng::seed_from_u64(99);
    let mut state = MarkovState::new("Technology");
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..1000 {
        *counts
            .entry(state.step(&model, Some(&persona), &mut rng).to_string())
            .or_default() += 1;
    }

    let tech = counts.get("Technology").copied().unwrap_or(0);
    let privacy = counts.get("Privacy").copied().unwrap_or(0);
    let others: Vec<usize> = counts
        .iter()
        .filter(|(name, _)| *name != "Technology" && *name != "Privacy")
        .map(|(_, n)| *n)
        .collect();
    let mean_other = others.iter().sum::<usize>() / others.len().max(1);
    assert!(tech > mean_other, "Technology {tech}, mean other {mean_other}");
    assert!(privacy > mean_other, "Privacy {privacy}, mean other {mean_other}");
}

#[test]
fn scenario_d_fingerprints_consistent() {
    let mut rng = StdRng::seed_from_u64(123);
    let fingerprints: Vec<Fingerprint> =
        (0..200).map(|_| Fingerprint::generate(&mut rng)).collect();
    for fp in &fingerprints {
        fp.validate().unwrap();
        if fp.device == DeviceClass::Mobile {
            assert!(fp
                .client_hints
                .iter()
                .all(|(name, value)| *name != "Sec-CH-UA-Mobile" || value == "?1"));
        }
    }
    let distinct: std::collections::HashSet<u64> = fingerprints.iter().map(|f| f.id).collect();
    assert!(distinct.len() > 1);
}

#[tokio::test]
async fn dry_run_pool_stops_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let audit = dir.path().join("audit.jsonl");
    let mut config = fast_config(3);
    config.audit_log = Some(audit.clone());
    config.issue_mode = Some("mixed".parse().unwrap());
    config.include = ContentFilter::all();

    let fetcher = Arc::new(DryRunFetcher::new());
    let pool = Orchestrator::new(config, &Catalog::builtin(), fetcher.clone())
        .unwrap()
        .start()
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    pool.stop();
    let summary = tokio::time::timeout(Duration::from_secs(10), pool.wait())
        .await
        .unwrap()
        .unwrap();

    assert!(summary.counters.requests > 0);
    assert_eq!(summary.counters.requests, fetcher.fetched());
    assert_eq!(summary.visits, summary.counters.requests);
    assert!(summary.distinct_fingerprints <= 3);
    assert!((0.0..=100.0).contains(&summary.score.total));

    let lines = std::fs::read_to_string(&audit).unwrap().lines().count() as u64;
    assert_eq!(lines, summary.counters.requests);
}

struct PanickingFetcher;

#[async_trait]
impl Fetcher for PanickingFetcher {
    async fn fetch(&self, _request: &OutboundRequest) -> Result<FetchOutcome, FetchError> {
        panic!("transport blew up");
    }
}

#[tokio::test]
async fn crashing_workers_restart_then_retire() {
    let pool = Orchestrator::new(fast_config(2), &Catalog::builtin(), Arc::new(PanickingFetcher))
        .unwrap()
        .start()
        .unwrap();
    let telemetry = pool.telemetry();
    // No stop request: the run ends once every slot is retired.
    let summary = tokio::time::timeout(Duration::from_secs(10), pool.wait())
        .await
        .unwrap()
        .unwrap();

    // Initial session plus two restarts per slot.
    assert_eq!(summary.counters.crashes, 6);
    assert_eq!(summary.counters.retired, 2);
    assert!(telemetry.workers().iter().all(|w| w.retired && w.restarts == 3));
}

struct FlakyFetcher {
    calls: AtomicU64,
}

#[async_trait]
impl Fetcher for FlakyFetcher {
    async fn fetch(&self, request: &OutboundRequest) -> Result<FetchOutcome, FetchError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            Err(FetchError::Transport {
                url: request.url.clone(),
                reason: "connection reset".into(),
            })
        } else {
            Ok(FetchOutcome {
                status: 200,
                headline: Some(format!("headline {}", request.id)),
                ..Default::default()
            })
        }
    }
}

#[tokio::test]
async fn fetch_errors_are_not_fatal() {
    let mut config = fast_config(2);
    config.max_headlines = 4;
    let fetcher = Arc::new(FlakyFetcher {
        calls: AtomicU64::new(0),
    });
    let pool = Orchestrator::new(config, &Catalog::builtin(), fetcher)
        .unwrap()
        .start()
        .unwrap();
    let telemetry = pool.telemetry();
    tokio::time::sleep(Duration::from_millis(300)).await;
    pool.stop();
    let summary = pool.wait().await.unwrap();

    assert!(summary.counters.requests >= 4);
    assert!(summary.counters.errors >= 1);
    assert!(summary.counters.errors < summary.counters.requests);
    assert_eq!(summary.counters.crashes, 0);
    assert!(telemetry.headlines().len() <= 4);
    assert!(!telemetry.headlines().is_empty());
}
