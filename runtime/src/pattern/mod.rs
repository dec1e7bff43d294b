//! Traffic pattern models: category chain, browsing pace, chaotic timing
//! and persona scheduling.

pub mod browsing;
pub mod chaos;
pub mod markov;
pub mod pacing;
pub mod schedule;

pub use browsing::BrowsingPattern;
pub use chaos::{ChaosTimer, DelayRange};
pub use markov::{MarkovModel, MarkovState, DEFAULT_PERSONA_BOOST};
pub use pacing::Pacer;
pub use schedule::{resolve_persona, DayPart};
