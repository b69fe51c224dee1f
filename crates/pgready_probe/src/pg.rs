//! PostgreSQL probe implementation.
//!
//! One probe is a full connect/close cycle against the server, so
//! "ready" means the database accepted a session, not just that the
//! port is open.

use crate::config::Config;
use crate::{Probe, ProbeError};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection};

/// Probes a PostgreSQL server by opening and immediately closing a
/// single connection.
#[derive(Clone, Debug)]
pub struct PostgresProbe {
    options: PgConnectOptions,
}

impl PostgresProbe {
    pub fn new(config: &Config) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(config.password.expose_secret());
        Self { options }
    }
}

#[async_trait]
impl Probe for PostgresProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(classify)?;
        // Close before reporting readiness so no handle outlives the probe.
        conn.close().await.map_err(classify)?;
        Ok(())
    }

    fn describe(&self) -> String {
        "PostgreSQL".into()
    }
}

/// Map a sqlx error into the probe taxonomy. Transport failures and the
/// transient startup SQLSTATEs are retryable; anything else is fatal.
fn classify(err: sqlx::Error) -> ProbeError {
    match err {
        sqlx::Error::Io(e) => ProbeError::Unreachable(e.to_string()),
        sqlx::Error::Tls(e) => ProbeError::Unreachable(e.to_string()),
        sqlx::Error::Database(db) => {
            let code = db.code().map(|c| c.into_owned());
            classify_db_code(code.as_deref(), db.message().to_string())
        }
        sqlx::Error::Configuration(e) => ProbeError::Config(e.to_string()),
        sqlx::Error::Protocol(s) => ProbeError::Protocol(s),
        other => ProbeError::Protocol(other.to_string()),
    }
}

/// SQLSTATE-driven classification of server-reported errors, split out
/// so the mapping is testable without a live server.
fn classify_db_code(code: Option<&str>, message: String) -> ProbeError {
    match code {
        // invalid_authorization_specification / invalid_password: the
        // role may not have been created yet during container startup.
        Some("28000") | Some("28P01") => ProbeError::Auth(message),
        // invalid_catalog_name: database not created yet.
        Some("3D000") => ProbeError::DatabaseMissing(message),
        // cannot_connect_now: server is up but still starting.
        Some("57P03") => ProbeError::Starting(message),
        _ => ProbeError::Database(message),
    }
}
