//! Outbound request descriptions handed to a fetcher.
//!
//! An `OutboundRequest` is everything the transport needs: the target URL,
//! headers in the exact order they should hit the wire, and any cookie
//! pairs the decoy layer attached. It also carries the bookkeeping the
//! telemetry and audit layers report on.

use crate::issue::IssueType;
use crate::stealth::Fingerprint;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic counter for request ids.
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// What produced a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestOrigin {
    /// A Markov click into a catalog category.
    Browse { category: String },
    /// An issue-session step.
    Issue {
        issue: IssueType,
        label: String,
        query: Option<String>,
    },
}

impl RequestOrigin {
    /// Short description for logs: the category or the issue action.
    pub fn label(&self) -> &str {
        match self {
            RequestOrigin::Browse { category } => category,
            RequestOrigin::Issue { label, .. } => label,
        }
    }

    pub fn is_issue(&self) -> bool {
        matches!(self, RequestOrigin::Issue { .. })
    }

    /// Catalog category counted for diversity; browse visits only.
    pub fn category(&self) -> Option<&str> {
        match self {
            RequestOrigin::Browse { category } => Some(category),
            RequestOrigin::Issue { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundRequest {
    /// Unique request identifier.
    pub id: String,
    pub worker: usize,
    pub url: String,
    /// Header pairs in emission order.
    pub headers: Vec<(String, String)>,
    /// Cookie pairs (name -> value).
    pub cookies: BTreeMap<String, String>,
    pub origin: RequestOrigin,
    pub fingerprint_id: u64,
}

impl OutboundRequest {
    /// Build a request for `url` carrying `fingerprint`'s headers.
    ///
    /// The id combines the current timestamp with an atomic counter.
    pub fn new(worker: usize, url: &str, fingerprint: &Fingerprint, origin: RequestOrigin) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);

        Self {
            id: format!("req-{ts}-{counter}"),
            worker,
            url: url.to_string(),
            headers: fingerprint.headers(),
            cookies: BTreeMap::new(),
            origin,
            fingerprint_id: fingerprint.id,
        }
    }

    /// Attach cookie pairs, replacing any with the same name.
    pub fn with_cookies<I>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.cookies.extend(cookies);
        self
    }

    /// Append a `Referer` header. Empty or missing values leave the
    /// headers untouched.
    pub fn with_referer(mut self, referer: Option<&str>) -> Self {
        if let Some(value) = referer.filter(|r| !r.is_empty()) {
            self.headers.push(("Referer".to_string(), value.to_string()));
        }
        self
    }

    pub fn referer(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name == "Referer")
            .map(|(_, value)| value.as_str())
    }

    pub fn is_decoyed(&self) -> bool {
        !self.cookies.is_empty()
    }

    /// Format cookies as a `Cookie` header value, sorted by name.
    ///
    /// Returns `None` when no cookies are attached.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Host part of the URL, if it parses.
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()?
            .host_str()
            .map(str::to_string)
    }
}
