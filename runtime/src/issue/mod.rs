//! Troubleshooting-session simulation.
//!
//! A worker in issue mode acts out someone fighting a technical problem:
//! searches that grow more desperate, support and forum visits, and now
//! and then the discovery that the real problem is a related one.

pub mod patterns;
pub mod query;
pub mod session;
pub mod types;

pub use patterns::{pattern, IssuePattern};
pub use query::SearchEngine;
pub use session::{
    ChainEvent, ConcludeReason, IssueAction, IssuePhase, IssueRequest, IssueSelector,
    IssueSession, StepOutcome,
};
pub use types::{FrustrationTier, FrustrationTiers, IssueFamily, IssueType, Urgency};
