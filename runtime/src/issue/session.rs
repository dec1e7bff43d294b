//! Issue sessions: frustration escalation, chaining and conclusion.

use super::patterns::pattern;
use super::query::{escalate, SearchEngine};
use super::types::{FrustrationTier, FrustrationTiers, IssueFamily, IssueType};
use crate::config::IssueConfig;
use crate::error::ConfigError;
use crate::pattern::DelayRange;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Which issues a worker may act out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IssueSelector {
    Single(IssueType),
    Family(IssueFamily),
    Mixed,
}

impl IssueSelector {
    pub fn candidates(&self) -> Vec<IssueType> {
        match self {
            IssueSelector::Single(t) => vec![*t],
            IssueSelector::Family(f) => f.members().collect(),
            IssueSelector::Mixed => IssueType::ALL.to_vec(),
        }
    }

    /// Draw an issue, weighted by prevalence.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> IssueType {
        let candidates = self.candidates();
        match WeightedIndex::new(candidates.iter().map(|t| pattern(*t).prevalence)) {
            Ok(dist) => candidates[dist.sample(rng)],
            Err(_) => candidates
                .choose(rng)
                .copied()
                .unwrap_or(IssueType::Wifi),
        }
    }
}

impl FromStr for IssueSelector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        if matches!(needle.as_str(), "mixed" | "random" | "all") {
            return Ok(IssueSelector::Mixed);
        }
        if let Ok(family) = needle.parse::<IssueFamily>() {
            return Ok(IssueSelector::Family(family));
        }
        needle.parse::<IssueType>().map(IssueSelector::Single)
    }
}

impl TryFrom<String> for IssueSelector {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IssueSelector> for String {
    fn from(value: IssueSelector) -> Self {
        value.to_string()
    }
}

impl fmt::Display for IssueSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSelector::Single(t) => f.write_str(t.as_str()),
            IssueSelector::Family(fam) => f.write_str(fam.as_str()),
            IssueSelector::Mixed => f.write_str("mixed"),
        }
    }
}

/// What the simulated user does on one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueAction {
    Search,
    Support,
    Forum,
    Tool,
    Video,
    Purchase,
}

impl IssueAction {
    const MIX: [(IssueAction, f64); 5] = [
        (IssueAction::Search, 0.40),
        (IssueAction::Support, 0.25),
        (IssueAction::Forum, 0.20),
        (IssueAction::Tool, 0.10),
        (IssueAction::Video, 0.05),
    ];

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match WeightedIndex::new(Self::MIX.iter().map(|(_, w)| *w)) {
            Ok(dist) => Self::MIX[dist.sample(rng)].0,
            Err(_) => IssueAction::Search,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueAction::Search => "search",
            IssueAction::Support => "support",
            IssueAction::Forum => "forum",
            IssueAction::Tool => "tool",
            IssueAction::Video => "video",
            IssueAction::Purchase => "purchase",
        }
    }
}

/// One outbound visit produced by a session step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueRequest {
    pub issue: IssueType,
    pub action: IssueAction,
    pub url: String,
    pub engine: Option<SearchEngine>,
    pub query: Option<String>,
    pub tier: FrustrationTier,
}

impl IssueRequest {
    /// Label used in place of a category name in telemetry.
    pub fn label(&self) -> String {
        match self.engine {
            Some(engine) => format!("{}_{}", self.action.as_str(), engine.as_str()),
            None => self.action.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcludeReason {
    Duration,
    ChainLimit,
    NoChainTargets,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "reason")]
pub enum IssuePhase {
    Idle,
    Active,
    Chained,
    Concluded(ConcludeReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainEvent {
    pub from: IssueType,
    pub to: IssueType,
    pub depth: u32,
}

/// Result of a single [`IssueSession::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    pub request: Option<IssueRequest>,
    pub chained: Option<ChainEvent>,
    pub concluded: Option<ConcludeReason>,
}

/// A worker's troubleshooting episode.
#[derive(Debug, Clone)]
pub struct IssueSession {
    id: Uuid,
    issue: IssueType,
    phase: IssuePhase,
    frustration: u32,
    depth: u32,
    history: Vec<IssueType>,
    started: Instant,
    deadline: Instant,
    steps: u64,
}

impl IssueSession {
    pub fn new(issue: IssueType, started: Instant, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            issue,
            phase: IssuePhase::Idle,
            frustration: 0,
            depth: 0,
            history: vec![issue],
            started,
            deadline: started + duration,
            steps: 0,
        }
    }

    /// Open a session for an issue drawn from `selector`, lasting a random
    /// time inside the configured session range.
    pub fn start<R: Rng + ?Sized>(
        selector: &IssueSelector,
        config: &IssueConfig,
        now: Instant,
        rng: &mut R,
    ) -> Self {
        let issue = selector.pick(rng);
        let range = config.session_secs;
        let secs = if range.max_secs > range.min_secs {
            rng.gen_range(range.min_secs..=range.max_secs)
        } else {
            range.min_secs
        };
        debug!("issue session opened: {issue} for {secs:.0}s");
        Self::new(issue, now, Duration::from_secs_f64(secs))
    }

    /// Resume at a known frustration count.
    pub fn with_frustration(mut self, frustration: u32) -> Self {
        self.frustration = frustration;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn issue(&self) -> IssueType {
        self.issue
    }

    pub fn phase(&self) -> IssuePhase {
        self.phase
    }

    pub fn frustration(&self) -> u32 {
        self.frustration
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn history(&self) -> &[IssueType] {
        &self.history
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self.phase, IssuePhase::Concluded(_))
    }

    pub fn tier(&self, tiers: &FrustrationTiers) -> FrustrationTier {
        tiers.tier(self.frustration)
    }

    /// Wait range before the next step.
    ///
    /// Urgency picks the base range. Past five steps of frustration it
    /// shrinks by 5% per step, down to 30% of the base.
    pub fn delay_range(&self) -> DelayRange {
        let base = pattern(self.issue).urgency.delay_range();
        if self.frustration > 5 {
            let factor = (1.0 - 0.05 * self.frustration as f64).max(0.3);
            base.compressed(factor)
        } else {
            base
        }
    }

    /// Calm base query escalated to the current tier.
    pub fn search_query<R: Rng + ?Sized>(&self, tiers: &FrustrationTiers, rng: &mut R) -> String {
        let base = pattern(self.issue)
            .queries
            .choose(rng)
            .copied()
            .unwrap_or(self.issue.as_str());
        escalate(base, self.tier(tiers), rng)
    }

    /// Advance one step.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        now: Instant,
        config: &IssueConfig,
        rng: &mut R,
    ) -> StepOutcome {
        if let IssuePhase::Concluded(reason) = self.phase {
            return StepOutcome {
                concluded: Some(reason),
                ..Default::default()
            };
        }
        if now >= self.deadline {
            return self.conclude(ConcludeReason::Duration, StepOutcome::default());
        }

        self.steps += 1;
        self.frustration = self.frustration.saturating_add(1);
        if self.phase == IssuePhase::Idle {
            self.phase = IssuePhase::Active;
        }

        if self.frustration >= config.resolve_after && rng.gen_bool(config.resolve_probability) {
            let request = self.purchase_request(rng);
            return self.conclude(
                ConcludeReason::Resolved,
                StepOutcome {
                    request: Some(request),
                    ..Default::default()
                },
            );
        }

        let mut outcome = StepOutcome {
            request: Some(self.action_request(&config.thresholds, rng)),
            ..Default::default()
        };

        if rng.gen_bool(config.chain_factor) {
            let targets = pattern(self.issue).chains;
            if targets.is_empty() {
                return self.conclude(ConcludeReason::NoChainTargets, outcome);
            }
            if self.depth + 1 > config.max_chain_depth {
                return self.conclude(ConcludeReason::ChainLimit, outcome);
            }
            let to = match WeightedIndex::new(targets.iter().map(|(_, w)| *w)) {
                Ok(dist) => targets[dist.sample(rng)].0,
                Err(_) => return self.conclude(ConcludeReason::NoChainTargets, outcome),
            };
            let from = self.issue;
            self.depth += 1;
            self.issue = to;
            self.history.push(to);
            self.frustration /= 2;
            self.phase = IssuePhase::Chained;
            debug!("issue chained {from} -> {to} at depth {}", self.depth);
            outcome.chained = Some(ChainEvent {
                from,
                to,
                depth: self.depth,
            });
        }

        outcome
    }

    fn conclude(&mut self, reason: ConcludeReason, mut outcome: StepOutcome) -> StepOutcome {
        debug!("issue session {} concluded: {reason:?}", self.id);
        self.phase = IssuePhase::Concluded(reason);
        outcome.concluded = Some(reason);
        outcome
    }

    fn action_request<R: Rng + ?Sized>(
        &self,
        tiers: &FrustrationTiers,
        rng: &mut R,
    ) -> IssueRequest {
        let p = pattern(self.issue);
        let tier = self.tier(tiers);
        let action = IssueAction::random(rng);
        let site = match action {
            IssueAction::Support => p.support_sites.choose(rng),
            IssueAction::Forum => p.forums.choose(rng),
            IssueAction::Tool => p.tools.choose(rng),
            _ => None,
        };

        if let Some(url) = site {
            return IssueRequest {
                issue: self.issue,
                action,
                url: url.to_string(),
                engine: None,
                query: None,
                tier,
            };
        }

        let (action, engine, query) = if action == IssueAction::Video {
            let base = p.queries.choose(rng).copied().unwrap_or(self.issue.as_str());
            let query = escalate(&format!("how to fix {base}"), tier, rng);
            (IssueAction::Video, SearchEngine::YouTube, query)
        } else {
            let query = self.search_query(tiers, rng);
            (IssueAction::Search, SearchEngine::random_web(rng), query)
        };
        IssueRequest {
            issue: self.issue,
            action,
            url: engine.search_url(&query),
            engine: Some(engine),
            query: Some(query),
            tier,
        }
    }

    fn purchase_request<R: Rng + ?Sized>(&self, rng: &mut R) -> IssueRequest {
        let query = self
            .issue
            .family()
            .resolution_queries()
            .choose(rng)
            .copied()
            .unwrap_or("buy new computer")
            .to_string();
        let engine = SearchEngine::random_web(rng);
        IssueRequest {
            issue: self.issue,
            action: IssueAction::Purchase,
            url: engine.search_url(&query),
            engine: Some(engine),
            query: Some(query),
            tier: FrustrationTier::Calm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::query::classify;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_config() -> IssueConfig {
        IssueConfig {
            chain_factor: 0.0,
            resolve_probability: 0.0,
            ..IssueConfig::default()
        }
    }

    fn session(issue: IssueType) -> IssueSession {
        IssueSession::new(issue, Instant::now(), Duration::from_secs(3600))
    }

    #[test]
    fn test_wifi_calm_query_at_one() {
        let mut rng = StdRng::seed_from_u64(11);
        let s = session(IssueType::Wifi).with_frustration(1);
        let tiers = FrustrationTiers::default();
        assert_eq!(s.tier(&tiers), FrustrationTier::Calm);
        for _ in 0..20 {
            let q = s.search_query(&tiers, &mut rng);
            assert!(pattern(IssueType::Wifi).queries.contains(&q.as_str()), "{q}");
        }
    }

    #[test]
    fn test_wifi_frantic_at_twelve() {
        let mut rng = StdRng::seed_from_u64(12);
        let s = session(IssueType::Wifi).with_frustration(12);
        let tiers = FrustrationTiers::default();
        assert_eq!(s.tier(&tiers), FrustrationTier::Frantic);
        let q = s.search_query(&tiers, &mut rng);
        assert!(q.starts_with("HELP WIFI"), "{q}");
        assert_eq!(classify(&q), FrustrationTier::Frantic);
    }

    #[test]
    fn test_count_eight_is_desperate() {
        let mut rng = StdRng::seed_from_u64(13);
        let s = session(IssueType::Dns).with_frustration(8);
        let q = s.search_query(&FrustrationTiers::default(), &mut rng);
        assert_eq!(classify(&q), FrustrationTier::Desperate, "{q}");
    }

    #[test]
    fn test_frustration_monotone_and_tiers_follow_table() {
        let mut rng = StdRng::seed_from_u64(14);
        let config = quiet_config();
        let mut s = session(IssueType::SlowComputer);
        let now = s.started();
        let mut last = 0;
        for _ in 0..40 {
            let outcome = s.step(now, &config, &mut rng);
            assert!(s.frustration() > last);
            last = s.frustration();
            let request = outcome.request.unwrap();
            assert_eq!(request.tier, config.thresholds.tier(s.frustration()));
            if request.action == IssueAction::Search {
                let q = request.query.unwrap();
                assert_eq!(classify(&q), request.tier, "{q}");
            }
        }
        assert_eq!(s.phase(), IssuePhase::Active);
    }

    #[test]
    fn test_chains_follow_declared_targets_and_bound() {
        let mut rng = StdRng::seed_from_u64(15);
        let config = IssueConfig {
            chain_factor: 1.0,
            resolve_probability: 0.0,
            max_chain_depth: 3,
            ..IssueConfig::default()
        };
        for start in IssueType::ALL {
            let mut s = session(start);
            let now = s.started();
            for _ in 0..20 {
                let outcome = s.step(now, &config, &mut rng);
                if let Some(chain) = outcome.chained {
                    let declared = pattern(chain.from).chains;
                    assert!(declared.iter().any(|(t, _)| *t == chain.to));
                }
                assert!(s.depth() <= config.max_chain_depth);
                if s.is_concluded() {
                    break;
                }
            }
            assert!(s.is_concluded(), "{start} never concluded");
            assert_eq!(s.history().len() as u32, s.depth() + 1);
            match s.phase() {
                IssuePhase::Concluded(ConcludeReason::ChainLimit) => {
                    assert_eq!(s.depth(), 3)
                }
                IssuePhase::Concluded(ConcludeReason::NoChainTargets) => {
                    assert!(pattern(s.issue()).chains.is_empty())
                }
                other => panic!("unexpected phase {other:?}"),
            }
        }
    }

    #[test]
    fn test_chain_halves_frustration() {
        let mut rng = StdRng::seed_from_u64(16);
        let config = IssueConfig {
            chain_factor: 1.0,
            resolve_probability: 0.0,
            ..IssueConfig::default()
        };
        let mut s = session(IssueType::Wifi).with_frustration(9);
        let now = s.started();
        let outcome = s.step(now, &config, &mut rng);
        assert!(outcome.chained.is_some());
        assert_eq!(s.frustration(), 5);
        assert_eq!(s.phase(), IssuePhase::Chained);
        assert_eq!(s.depth(), 1);
    }

    #[test]
    fn test_no_targets_concludes() {
        let mut rng = StdRng::seed_from_u64(17);
        let config = IssueConfig {
            chain_factor: 1.0,
            resolve_probability: 0.0,
            ..IssueConfig::default()
        };
        let mut s = session(IssueType::BootFailure);
        let now = s.started();
        let outcome = s.step(now, &config, &mut rng);
        assert!(outcome.request.is_some());
        assert_eq!(outcome.concluded, Some(ConcludeReason::NoChainTargets));
        let after = s.step(now, &config, &mut rng);
        assert!(after.request.is_none());
    }

    #[test]
    fn test_duration_elapsed() {
        let mut rng = StdRng::seed_from_u64(18);
        let start = Instant::now();
        let mut s = IssueSession::new(IssueType::Dns, start, Duration::from_secs(60));
        let outcome = s.step(start + Duration::from_secs(61), &quiet_config(), &mut rng);
        assert!(outcome.request.is_none());
        assert_eq!(outcome.concluded, Some(ConcludeReason::Duration));
        assert_eq!(s.frustration(), 0);
    }

    #[test]
    fn test_resolution_emits_purchase() {
        let mut rng = StdRng::seed_from_u64(19);
        let config = IssueConfig {
            resolve_after: 3,
            resolve_probability: 1.0,
            chain_factor: 0.0,
            ..IssueConfig::default()
        };
        let mut s = session(IssueType::Ransomware);
        let now = s.started();
        assert!(s.step(now, &config, &mut rng).concluded.is_none());
        assert!(s.step(now, &config, &mut rng).concluded.is_none());
        let outcome = s.step(now, &config, &mut rng);
        assert_eq!(outcome.concluded, Some(ConcludeReason::Resolved));
        let request = outcome.request.unwrap();
        assert_eq!(request.action, IssueAction::Purchase);
        let query = request.query.unwrap();
        assert!(IssueFamily::Malware
            .resolution_queries()
            .contains(&query.as_str()));
    }

    #[test]
    fn test_delay_compresses_with_frustration() {
        let base = pattern(IssueType::Wifi).urgency.delay_range();
        assert_eq!(session(IssueType::Wifi).delay_range(), base);
        assert_eq!(
            session(IssueType::Wifi).with_frustration(5).delay_range(),
            base
        );
        let ten = session(IssueType::Wifi).with_frustration(10).delay_range();
        assert!((ten.max_secs - base.max_secs * 0.5).abs() < 1e-9);
        let many = session(IssueType::Wifi).with_frustration(40).delay_range();
        assert!((many.max_secs - base.max_secs * 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_selector_parsing_and_pick() {
        assert_eq!("mixed".parse::<IssueSelector>().unwrap(), IssueSelector::Mixed);
        assert_eq!(
            "malware".parse::<IssueSelector>().unwrap(),
            IssueSelector::Family(IssueFamily::Malware)
        );
        assert_eq!(
            "wifi".parse::<IssueSelector>().unwrap(),
            IssueSelector::Single(IssueType::Wifi)
        );
        assert!("toaster".parse::<IssueSelector>().is_err());

        let mut rng = StdRng::seed_from_u64(20);
        let family = IssueSelector::Family(IssueFamily::Software);
        for _ in 0..200 {
            assert_eq!(family.pick(&mut rng).family(), IssueFamily::Software);
        }
        let single = IssueSelector::Single(IssueType::Bsod);
        assert_eq!(single.pick(&mut rng), IssueType::Bsod);
    }

    #[test]
    fn test_selector_serde() {
        let s: IssueSelector = serde_json::from_str("\"network\"").unwrap();
        assert_eq!(s, IssueSelector::Family(IssueFamily::Network));
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"network\"");
    }
}
