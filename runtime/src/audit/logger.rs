//! JSONL audit logger: append-only record of every outbound request.

use crate::acquisition::{OutboundRequest, RequestOrigin};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A single audit record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub request_id: String,
    pub worker: usize,
    pub url: String,
    /// Category or issue-action label.
    pub target: String,
    pub issue: Option<String>,
    pub fingerprint_id: String,
    pub decoyed: bool,
    pub duration_ms: u64,
    pub status: String,
}

impl AuditEvent {
    pub fn for_request(request: &OutboundRequest, duration_ms: u64, status: &str) -> Self {
        let issue = match &request.origin {
            RequestOrigin::Issue { issue, .. } => Some(issue.to_string()),
            RequestOrigin::Browse { .. } => None,
        };
        Self {
            timestamp: Utc::now().to_rfc3339(),
            request_id: request.id.clone(),
            worker: request.worker,
            url: request.url.clone(),
            target: request.origin.label().to_string(),
            issue,
            fingerprint_id: format!("{:016x}", request.fingerprint_id),
            decoyed: request.is_decoyed(),
            duration_ms,
            status: status.to_string(),
        }
    }
}

/// Append-only JSONL audit logger.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create the audit log file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open audit log: {}", path.display()))?;

        Ok(Self { file })
    }

    /// Default location, `~/.chaff/audit.jsonl`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".chaff")
            .join("audit.jsonl")
    }

    pub fn log(&mut self, event: &AuditEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.file, "{json}")?;
        Ok(())
    }

    /// Log one request with its outcome.
    pub fn log_request(
        &mut self,
        request: &OutboundRequest,
        duration_ms: u64,
        status: &str,
    ) -> Result<()> {
        self.log(&AuditEvent::for_request(request, duration_ms, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueType;
    use crate::stealth::Fingerprint;

    #[test]
    fn test_appends_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");
        let fp = Fingerprint::baseline();

        let mut logger = AuditLogger::open(&path).unwrap();
        let browse = OutboundRequest::new(
            2,
            "https://example.com/",
            &fp,
            RequestOrigin::Browse {
                category: "world".into(),
            },
        );
        logger.log_request(&browse, 12, "ok").unwrap();
        let issue = OutboundRequest::new(
            3,
            "https://www.bing.com/search?q=dns",
            &fp,
            RequestOrigin::Issue {
                issue: IssueType::Dns,
                label: "search_bing".into(),
                query: Some("dns".into()),
            },
        )
        .with_cookies([("sid".to_string(), "x".to_string())]);
        logger.log_request(&issue, 0, "error").unwrap();
        drop(logger);

        let mut logger = AuditLogger::open(&path).unwrap();
        logger.log_request(&browse, 1, "ok").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["target"], "world");
        assert_eq!(lines[0]["issue"], serde_json::Value::Null);
        assert_eq!(lines[1]["issue"], "dns");
        assert_eq!(lines[1]["decoyed"], true);
        assert_eq!(lines[1]["worker"], 3);
        assert_eq!(lines[0]["fingerprint_id"].as_str().unwrap().len(), 16);
    }
}
