//! Concurrent worker pool.

pub mod manager;
pub mod resource_governor;
pub mod worker;

pub use manager::{Orchestrator, RunningPool};
pub use resource_governor::{RestartDecision, RestartGovernor};
pub use worker::{SessionWorker, StopHandle, StopSignal, WorkerContext};
