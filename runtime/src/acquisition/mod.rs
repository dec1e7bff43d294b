//! Outbound request construction and the fetch seam.

pub mod fetcher;
pub mod request;

pub use fetcher::{DryRunFetcher, FetchOutcome, Fetcher, HttpFetcher};
pub use request::{OutboundRequest, RequestOrigin};
