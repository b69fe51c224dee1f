//! Minimal `Probe` trait, retry loop, and probe implementations for
//! waiting on service readiness at startup.

use async_trait::async_trait;
use thiserror::Error;

pub mod config;
pub mod http;
pub mod pg;
pub mod retry;

/// Errors surfaced by a probe attempt or by configuration loading.
///
/// The retryable set is explicit and enumerable: transient startup
/// conditions are retried by [`retry::RetryPolicy`], everything else is
/// fatal and propagates to the caller on first occurrence.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("target unreachable: {0}")]
    Unreachable(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("database does not exist: {0}")]
    DatabaseMissing(String),
    #[error("server starting up: {0}")]
    Starting(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ProbeError {
    /// Whether the error is a transient connection-establishment
    /// failure worth retrying. Auth rejections and missing databases
    /// count: during container startup the role or database may simply
    /// not exist yet.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProbeError::Unreachable(_)
                | ProbeError::Auth(_)
                | ProbeError::DatabaseMissing(_)
                | ProbeError::Starting(_)
        )
    }
}

/// A single readiness check against some external target.
///
/// Implementations open a connection (or session), close it, and
/// return. `check` must never leak a handle: anything successfully
/// opened is closed before the method returns, on both paths.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Attempt one probe. `Ok(())` means the target accepted a
    /// connection which was then cleanly closed.
    async fn check(&self) -> Result<(), ProbeError>;

    /// Human-readable target label used in console output
    /// (e.g. "PostgreSQL").
    fn describe(&self) -> String;
}
