//! Audit trail of outbound traffic.

pub mod logger;

pub use logger::{AuditEvent, AuditLogger};
