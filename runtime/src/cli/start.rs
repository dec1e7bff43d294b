//! `chaff run`: build the engine, run it, report status until it stops.

use crate::acquisition::{DryRunFetcher, Fetcher, HttpFetcher};
use crate::catalog::{plugin, Catalog};
use crate::cli::output::{self, Styled};
use crate::cli::RunArgs;
use crate::config::EngineConfig;
use crate::pool::{Orchestrator, RunningPool};
use crate::telemetry::{RunSummary, Snapshot};
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Install the global tracing subscriber.
pub fn init_tracing(json: bool, verbose: bool) {
    let default = if verbose { "chaff=debug" } else { "chaff=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    // A subscriber may already be installed (tests); keep it.
    let _ = result;
}

/// Layer defaults, the optional config file and CLI flags.
pub fn build_config(args: &RunArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    if let Some(workers) = args.workers {
        config.workers = usize::from(workers);
    }
    if let Some(minutes) = args.duration {
        config.duration_minutes = minutes;
    }
    config.chaos |= args.chaos;
    config.stealth &= !args.no_stealth;
    config.decoys &= !args.no_decoys;
    config.scheduled |= args.schedule;
    config.dry_run |= args.dry_run;
    if let Some(selector) = &args.issue {
        config.issue_mode = Some(selector.parse()?);
    }
    if let Some(persona) = &args.persona {
        config.persona = Some(persona.clone());
    }
    for group in &args.include {
        if !config.include.enable(group) {
            bail!("unknown content group: {group}");
        }
    }
    if config.issue_mode.is_some() {
        config.include.issues = true;
    }
    if let Some(dir) = &args.plugins {
        config.plugin_dir = Some(dir.clone());
    }
    if let Some(path) = &args.audit_log {
        config.audit_log = Some(path.clone());
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(n) = args.max_headlines {
        config.max_headlines = n;
    }
    if let Some(scale) = args.time_scale {
        config.timing.time_scale = scale;
    }
    if let Some(secs) = args.status_interval {
        config.status_interval_secs = secs;
    }

    config.validate()?;
    Ok(config)
}

/// Catalog from built-ins plus the configured (or default) plugin dir.
pub fn load_catalog(plugin_dir: Option<&std::path::Path>) -> Catalog {
    match plugin_dir {
        Some(dir) => Catalog::load(Some(dir)),
        None => {
            let dir = plugin::default_plugin_dir();
            Catalog::load(dir.is_dir().then_some(dir.as_path()))
        }
    }
}

pub async fn run(args: RunArgs) -> Result<()> {
    let s = Styled::new();
    let config = build_config(&args)?;
    let catalog = load_catalog(config.plugin_dir.as_deref());

    let fetcher: Arc<dyn Fetcher> = if config.dry_run {
        Arc::new(DryRunFetcher::new())
    } else {
        Arc::new(
            HttpFetcher::new(Duration::from_secs(config.timing.fetch_timeout_secs))
                .context("building HTTP client")?,
        )
    };

    let status_every = Duration::from_secs(config.status_interval_secs.max(1));
    let workers = config.workers;
    let dry_run = config.dry_run;
    let orchestrator = Orchestrator::new(config, &catalog, fetcher)?;
    let pool = orchestrator.start()?;

    info!("chaff v{} started", env!("CARGO_PKG_VERSION"));
    if !output::is_quiet() && !output::is_json() {
        output::print_header(&s);
        eprintln!(
            "  {} {workers} workers running{}. Ctrl-C to stop.",
            s.ok_sym(),
            if dry_run { " (dry run)" } else { "" }
        );
        eprintln!();
    }

    let stop = pool.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received shutdown signal");
            stop.stop();
        }
    });

    report_until_done(&pool, status_every).await;
    let summary = pool.wait().await?;
    print_summary(&s, &summary)?;
    Ok(())
}

async fn report_until_done(pool: &RunningPool, every: Duration) {
    let telemetry = pool.telemetry();
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    while !pool.is_finished() {
        ticker.tick().await;
        if output::is_quiet() {
            continue;
        }
        let snapshot = telemetry.snapshot();
        if output::is_json() {
            if let Ok(value) = serde_json::to_value(&snapshot) {
                output::print_json_line(&value);
            }
        } else {
            eprintln!("{}", status_line(&Styled::new(), &snapshot, pool.active()));
        }
    }
}

/// One-line human status.
pub fn status_line(s: &Styled, snap: &Snapshot, active: usize) -> String {
    let c = &snap.counters;
    let issues: Vec<String> = snap
        .workers
        .iter()
        .filter_map(|w| {
            w.issue
                .as_ref()
                .map(|i| format!("{}:{i}({})", w.worker, w.frustration))
        })
        .collect();
    let mut line = format!(
        "  {} score {} {}  {} active  {} req  {} err  {} decoys",
        s.dim(&output::format_duration(snap.elapsed_secs)),
        s.score(snap.score.total),
        output::progress_bar(snap.score.total.round() as usize, 100, 10),
        active,
        c.requests,
        c.errors,
        c.decoys,
    );
    if !issues.is_empty() {
        line.push_str(&format!("  issues {}", issues.join(" ")));
    }
    if let Some(headline) = snap.headlines.last() {
        line.push_str(&format!("  {}", s.cyan(headline)));
    }
    line
}

fn print_summary(s: &Styled, summary: &RunSummary) -> Result<()> {
    if output::is_json() {
        output::print_json(&serde_json::to_value(summary)?);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }
    let c = &summary.counters;
    eprintln!();
    output::print_section(s, "Run summary");
    output::print_check(" ", "Elapsed:", &output::format_duration(summary.elapsed_secs));
    output::print_check(" ", "Requests:", &c.requests.to_string());
    output::print_check(" ", "Errors:", &c.errors.to_string());
    output::print_check(" ", "Decoyed:", &c.decoys.to_string());
    output::print_check(" ", "Issue sessions:", &c.issue_sessions.to_string());
    output::print_check(" ", "Chains:", &c.chains.to_string());
    output::print_check(
        " ",
        "Categories:",
        &summary.distinct_categories.to_string(),
    );
    output::print_check(
        " ",
        "Fingerprints:",
        &summary.distinct_fingerprints.to_string(),
    );
    if c.crashes > 0 {
        output::print_check(
            s.warn_sym(),
            "Crashes:",
            &format!("{} ({} slots retired)", c.crashes, c.retired),
        );
    }
    output::print_check(s.ok_sym(), "Privacy score:", &s.score(summary.score.total));
    Ok(())
}
