//! Engine configuration.
//!
//! Layered as defaults, then an optional JSON file, then CLI flags. Every
//! field has a serde default so a config file only needs the keys it
//! changes.

use crate::catalog::{Catalog, ContentFilter, Persona};
use crate::error::ConfigError;
use crate::issue::{FrustrationTiers, IssueSelector};
use crate::pattern::{browsing, DelayRange, DEFAULT_PERSONA_BOOST};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hard upper bound on concurrent workers.
pub const MAX_WORKERS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub workers: usize,
    /// Run length; 0 runs until stopped.
    pub duration_minutes: u64,
    pub chaos: bool,
    pub stealth: bool,
    pub decoys: bool,
    pub scheduled: bool,
    /// Issue simulation selector; `None` disables issue mode.
    pub issue_mode: Option<IssueSelector>,
    pub max_headlines: usize,
    pub persona: Option<String>,
    pub include: ContentFilter,
    pub persona_boost: f64,
    pub decoy_rate: f64,
    pub max_restarts: u32,
    /// Describe requests instead of sending them.
    pub dry_run: bool,
    pub audit_log: Option<PathBuf>,
    pub plugin_dir: Option<PathBuf>,
    pub status_interval_secs: u64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub timing: TimingConfig,
    pub issue: IssueConfig,
    pub score: ScoreConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            duration_minutes: 0,
            chaos: false,
            stealth: true,
            decoys: true,
            scheduled: false,
            issue_mode: None,
            max_headlines: 10,
            persona: None,
            include: ContentFilter::default(),
            persona_boost: DEFAULT_PERSONA_BOOST,
            decoy_rate: 0.7,
            max_restarts: 3,
            dry_run: false,
            audit_log: None,
            plugin_dir: None,
            status_interval_secs: 5,
            seed: None,
            timing: TimingConfig::default(),
            issue: IssueConfig::default(),
            score: ScoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Browsing delay range when chaos timing is on.
    pub chaos_range: DelayRange,
    /// Multiplier applied to every wait.
    pub time_scale: f64,
    pub fetch_timeout_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            chaos_range: browsing::CHAOS_RANGE,
            time_scale: 1.0,
            fetch_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueConfig {
    /// Per-step probability of chaining to a related issue.
    pub chain_factor: f64,
    pub max_chain_depth: u32,
    /// Frustration at which resolution becomes possible.
    pub resolve_after: u32,
    pub resolve_probability: f64,
    pub thresholds: FrustrationTiers,
    /// Chance an idle worker opens an issue session on an iteration.
    pub issue_share: f64,
    pub session_secs: DelayRange,
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            chain_factor: 0.3,
            max_chain_depth: 3,
            resolve_after: 10,
            resolve_probability: 0.15,
            thresholds: FrustrationTiers::default(),
            issue_share: 0.3,
            session_secs: DelayRange::new(60.0, 300.0),
        }
    }
}

/// Relative weight of each privacy sub-score. Normalised to 100 at use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub category: f64,
    pub fingerprint: f64,
    pub decoy: f64,
    pub issue: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            category: 35.0,
            fingerprint: 25.0,
            decoy: 25.0,
            issue: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Number of recent visits the score looks at.
    pub window: usize,
    pub category_target: usize,
    pub fingerprint_target: usize,
    pub issue_target_share: f64,
    pub weights: ScoreWeights,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            window: 200,
            category_target: 10,
            fingerprint_target: 5,
            issue_target_share: 0.2,
            weights: ScoreWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Structural checks that need no catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ConfigError::WorkerCount {
                got: self.workers,
                max: MAX_WORKERS,
            });
        }

        check_range("timing.chaos_range", self.timing.chaos_range)?;
        check_range("issue.session_secs", self.issue.session_secs)?;

        check_probability("decoy_rate", self.decoy_rate)?;
        check_probability("issue.chain_factor", self.issue.chain_factor)?;
        check_probability("issue.resolve_probability", self.issue.resolve_probability)?;
        check_probability("issue.issue_share", self.issue.issue_share)?;
        check_probability("score.issue_target_share", self.score.issue_target_share)?;

        if self.issue.max_chain_depth == 0 {
            return Err(ConfigError::ChainDepth);
        }
        if !self.persona_boost.is_finite() || self.persona_boost <= 0.0 {
            return Err(ConfigError::PersonaBoost(self.persona_boost));
        }

        check_positive("timing.time_scale", self.timing.time_scale)?;
        check_positive("score.window", self.score.window as f64)?;
        check_positive("score.category_target", self.score.category_target as f64)?;
        check_positive("score.fingerprint_target", self.score.fingerprint_target as f64)?;
        check_positive("score.issue_target_share", self.score.issue_target_share)?;

        let w = &self.score.weights;
        for (name, value) in [
            ("score.weights.category", w.category),
            ("score.weights.fingerprint", w.fingerprint),
            ("score.weights.decoy", w.decoy),
            ("score.weights.issue", w.issue),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        check_positive(
            "score.weights total",
            w.category + w.fingerprint + w.decoy + w.issue,
        )?;

        Ok(())
    }

    /// Look up the configured persona.
    pub fn persona_in<'a>(&self, catalog: &'a Catalog) -> Result<Option<&'a Persona>, ConfigError> {
        match &self.persona {
            None => Ok(None),
            Some(name) => catalog
                .persona(name)
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownPersona(name.clone())),
        }
    }
}

fn check_range(name: &str, range: DelayRange) -> Result<(), ConfigError> {
    if range.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::DelayRange {
            name: name.to_string(),
            min: range.min_secs,
            max: range.max_secs,
        })
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { name, value })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{IssueFamily, IssueType};

    #[test]
    fn test_defaults_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.issue.thresholds.thresholds(), [1, 3, 7, 12]);
        assert_eq!(config.score.window, 200);
    }

    #[test]
    fn test_worker_bounds() {
        for workers in [0, 31, 100] {
            let config = EngineConfig {
                workers,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::WorkerCount { got: workers, max: 30 })
            );
        }
        let config = EngineConfig {
            workers: 30,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.timing.chaos_range = DelayRange::new(10.0, 1.0);
        assert!(matches!(config.validate(), Err(ConfigError::DelayRange { .. })));

        let mut config = EngineConfig::default();
        config.issue.chain_factor = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Probability { name: "issue.chain_factor", .. })
        ));

        let mut config = EngineConfig::default();
        config.issue.max_chain_depth = 0;
        assert_eq!(config.validate(), Err(ConfigError::ChainDepth));

        let mut config = EngineConfig::default();
        config.persona_boost = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::PersonaBoost(0.0)));

        let mut config = EngineConfig::default();
        config.timing.time_scale = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chaff.json");
        std::fs::write(
            &path,
            r#"{
                "workers": 7,
                "issue_mode": "malware",
                "include": {"privacy": true},
                "issue": {"thresholds": [2, 4, 8, 16]}
            }"#,
        )
        .unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.workers, 7);
        assert_eq!(config.issue_mode, Some(IssueSelector::Family(IssueFamily::Malware)));
        assert!(config.include.privacy);
        assert!(!config.include.tabloids);
        assert_eq!(config.issue.thresholds.thresholds(), [2, 4, 8, 16]);
        assert_eq!(config.issue.chain_factor, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"issue": {"thresholds": [5, 4, 3, 2]}}"#).unwrap();
        assert!(matches!(
            EngineConfig::from_file(&path),
            Err(ConfigError::File { .. })
        ));
        assert!(EngineConfig::from_file(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_persona_lookup() {
        let catalog = Catalog::builtin();
        let config = EngineConfig {
            persona: Some("hobbyist".into()),
            issue_mode: Some(IssueSelector::Single(IssueType::Wifi)),
            ..Default::default()
        };
        assert_eq!(config.persona_in(&catalog).unwrap().unwrap().name, "hobbyist");

        let config = EngineConfig {
            persona: Some("astronaut".into()),
            ..Default::default()
        };
        assert_eq!(
            config.persona_in(&catalog),
            Err(ConfigError::UnknownPersona("astronaut".into()))
        );
    }
}
