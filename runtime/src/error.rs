//! Error types shared across the engine.
//!
//! Library code returns these typed errors; the CLI wraps them in
//! `anyhow` with context.

use thiserror::Error;

/// Rejected engine configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("worker count must be between 1 and {max}, got {got}")]
    WorkerCount { got: usize, max: usize },

    #[error("delay range for {name} is invalid: min {min}s, max {max}s")]
    DelayRange { name: String, min: f64, max: f64 },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("frustration thresholds must be strictly increasing and start at or above 1: {0:?}")]
    Thresholds([u32; 4]),

    #[error("max chain depth must be at least 1")]
    ChainDepth,

    #[error("persona boost must be positive and finite, got {0}")]
    PersonaBoost(f64),

    #[error("unknown persona: {0}")]
    UnknownPersona(String),

    #[error("unknown issue selector: {0}")]
    UnknownIssue(String),

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("cannot load config {path}: {reason}")]
    File { path: String, reason: String },

    #[error("no categories left to browse after applying content filters")]
    EmptyCatalog,
}

/// Failure loading or validating a catalog fragment.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read plugin {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("plugin {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by a fetch collaborator.
///
/// Always non-fatal to the engine: the worker records it and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}

/// A fingerprint whose fields contradict each other.
#[derive(Debug, Error, PartialEq)]
pub enum FingerprintError {
    #[error("mobile user agent carries desktop hint {header}: {value}")]
    DesktopHintOnMobile { header: String, value: String },

    #[error("desktop user agent carries mobile hint {header}: {value}")]
    MobileHintOnDesktop { header: String, value: String },

    #[error("non-chromium user agent sends client hint {0}")]
    UnexpectedClientHint(String),

    #[error("viewport {width}x{height} does not fit a {device} device")]
    Viewport {
        width: u32,
        height: u32,
        device: String,
    },

    #[error("header order is not a permutation of the canonical header set")]
    HeaderOrder,
}
