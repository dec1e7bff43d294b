//! Fetch collaborators.
//!
//! The engine only describes requests; a [`Fetcher`] performs them. Results
//! never steer browsing, they only feed telemetry.

use super::request::OutboundRequest;
use crate::error::FetchError;
use async_trait::async_trait;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::debug;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex is valid"));

/// Longest headline kept, in characters.
const MAX_HEADLINE_CHARS: usize = 140;

/// Result of a completed fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    /// HTTP status, 0 for dry runs.
    pub status: u16,
    pub bytes: usize,
    pub elapsed_ms: u64,
    /// Page title, when one was found.
    pub headline: Option<String>,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &OutboundRequest) -> Result<FetchOutcome, FetchError>;
}

/// Logs requests and never touches the network.
#[derive(Debug, Default)]
pub struct DryRunFetcher {
    fetched: AtomicU64,
}

impl DryRunFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests seen so far.
    pub fn fetched(&self) -> u64 {
        self.fetched.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Fetcher for DryRunFetcher {
    async fn fetch(&self, request: &OutboundRequest) -> Result<FetchOutcome, FetchError> {
        self.fetched.fetch_add(1, Ordering::Relaxed);
        debug!(
            worker = request.worker,
            url = %request.url,
            headers = request.headers.len(),
            cookies = request.cookies.len(),
            "dry run"
        );
        Ok(FetchOutcome::default())
    }
}

/// Real HTTP transport over reqwest with rustls.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &OutboundRequest) -> Result<FetchOutcome, FetchError> {
        let start = Instant::now();
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = request.cookie_header() {
            builder = builder.header("Cookie", cookie);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&request.url, e))?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        // The client decodes gzip, deflate and br bodies transparently.
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&request.url, e))?;
        let headline = extract_title(&String::from_utf8_lossy(&body));

        Ok(FetchOutcome {
            status: status.as_u16(),
            bytes: body.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
            headline,
        })
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

/// First `<title>` of an HTML document, whitespace-collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        return None;
    }
    Some(title.chars().take(MAX_HEADLINE_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::RequestOrigin;
    use crate::stealth::Fingerprint;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// `<html><head><title>Big News</title></head><body>story</body></html>`, gzipped.
    const GZIPPED_PAGE: [u8; 72] = [
        0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0xb3, 0xc9, 0x28, 0xc9, 0xcd,
        0xb1, 0xb3, 0xc9, 0x48, 0x4d, 0x4c, 0xb1, 0xb3, 0x29, 0xc9, 0x2c, 0xc9, 0x49, 0xb5, 0x73,
        0xca, 0x4c, 0x57, 0xf0, 0x4b, 0x2d, 0x2f, 0xb6, 0xd1, 0x87, 0xf0, 0x6d, 0xf4, 0x21, 0xb2,
        0x49, 0xf9, 0x29, 0x95, 0x76, 0xc5, 0x25, 0xf9, 0x45, 0x95, 0x36, 0xfa, 0x60, 0x36, 0x50,
        0x02, 0xa4, 0x19, 0x00, 0x1c, 0x96, 0x77, 0xc7, 0x43, 0x00, 0x00, 0x00,
    ];

    fn request(url: &str) -> OutboundRequest {
        OutboundRequest::new(
            0,
            url,
            &Fingerprint::baseline(),
            RequestOrigin::Browse {
                category: "world".into(),
            },
        )
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("<html><head><TITLE>\n  Storm  hits\tcoast </TITLE></head>"),
            Some("Storm hits coast".to_string())
        );
        assert_eq!(extract_title("<title lang=\"en\">A</title>"), Some("A".into()));
        assert_eq!(extract_title("<title>   </title>"), None);
        assert_eq!(extract_title("no title here"), None);
        let long = format!("<title>{}</title>", "x".repeat(500));
        assert_eq!(extract_title(&long).unwrap().len(), MAX_HEADLINE_CHARS);
    }

    #[tokio::test]
    async fn test_dry_run_counts() {
        let fetcher = DryRunFetcher::new();
        let outcome = fetcher.fetch(&request("https://example.com/")).await.unwrap();
        assert_eq!(outcome.status, 0);
        assert_eq!(fetcher.fetched(), 1);
    }

    #[tokio::test]
    async fn test_http_fetch_sends_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .and(header("cookie", "_ga=GA1.2.5.6; sid=abc"))
            .and(header_exists("user-agent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><title>Morning briefing</title></html>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let req = request(&format!("{}/news", server.uri())).with_cookies([
            ("sid".to_string(), "abc".to_string()),
            ("_ga".to_string(), "GA1.2.5.6".to_string()),
        ]);
        let outcome = fetcher.fetch(&req).await.unwrap();
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.headline.as_deref(), Some("Morning briefing"));
    }

    #[tokio::test]
    async fn test_http_fetch_errors() {
        let server = MockServer::start().await;
        Mock::given(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_millis(200)).unwrap();
        let err = fetcher
            .fetch(&request(&format!("{}/missing", server.uri())))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));

        let err = fetcher
            .fetch(&request(&format!("{}/slow", server.uri())))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_http_fetch_decodes_gzip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compressed"))
            .and(header_exists("accept-encoding"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-encoding", "gzip")
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(GZIPPED_PAGE.to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let outcome = fetcher
            .fetch(&request(&format!("{}/compressed", server.uri())))
            .await
            .unwrap();
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.headline.as_deref(), Some("Big News"));
    }
}
