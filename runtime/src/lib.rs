//! Chaff runtime: a stochastic traffic-pattern engine.
//!
//! Workers browse a category catalog along a persona-biased Markov chain,
//! pace themselves with chaotic or pattern-driven delays, now and then act
//! out a troubleshooting session, and wear a randomized fingerprint plus
//! decoy cookies. The orchestrator runs them concurrently and aggregates a
//! privacy score from what they emit.

pub mod acquisition;
pub mod audit;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod issue;
pub mod pattern;
pub mod pool;
pub mod stealth;
pub mod telemetry;
