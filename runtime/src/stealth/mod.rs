//! Identity diversification: fingerprints and decoy claims.

pub mod agents;
pub mod decoy;
pub mod fingerprint;

pub use agents::{DeviceClass, Engine, Platform, UserAgentProfile};
pub use decoy::{DecoyBundle, DecoyInjector};
pub use fingerprint::Fingerprint;
