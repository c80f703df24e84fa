//! Database seam for the reset executor.
//!
//! `SeedDatabase` hands out one `SeedSession` per reset. Sessions are never
//! pooled: the executor opens one, runs the seed statements, commits and
//! closes it.
//!
//! The production implementation talks to MySQL through `sqlx` using the text
//! protocol (`sqlx::raw_sql`), so statements behave as they would in the
//! `mysql` client. Autocommit is switched off on connect so the final
//! `COMMIT` covers the whole batch (DDL still commits implicitly in MySQL).

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{DatabaseConfig, StartupProbe};
use crate::error::{ResetError, Result};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A single statement was rejected by the server. Non-fatal for a reset.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StatementError(pub String);

#[async_trait]
pub trait SeedDatabase: Send + Sync {
    /// Open a fresh privileged session.
    async fn connect(&self) -> Result<Box<dyn SeedSession>>;

    /// Check that the server accepts connections.
    async fn ping(&self) -> Result<()> {
        let mut session = self.connect().await?;
        session.close().await
    }

    /// Human-readable target, safe to log.
    fn describe(&self) -> String;
}

#[async_trait]
pub trait SeedSession: Send {
    async fn execute(&mut self, statement: &str) -> std::result::Result<(), StatementError>;

    async fn commit(&mut self) -> Result<()>;

    /// Close the underlying connection. Idempotent.
    async fn close(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MySQL
// ---------------------------------------------------------------------------

pub struct MySqlSeedDatabase {
    options: MySqlConnectOptions,
    connect_timeout: Duration,
    target: String,
}

impl MySqlSeedDatabase {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .charset("utf8mb4");
        Self {
            options,
            connect_timeout: config.connect_timeout(),
            target: config.describe(),
        }
    }

    async fn open(&self) -> Result<MySqlConnection> {
        let unreachable = |reason: String| ResetError::DatabaseUnreachable {
            attempts: 1,
            reason,
        };
        match tokio::time::timeout(
            self.connect_timeout,
            MySqlConnection::connect_with(&self.options),
        )
        .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(unreachable(e.to_string())),
            Err(_) => Err(unreachable(format!(
                "connect timed out after {}s",
                self.connect_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl SeedDatabase for MySqlSeedDatabase {
    async fn connect(&self) -> Result<Box<dyn SeedSession>> {
        let mut conn = self.open().await?;
        conn.execute(sqlx::raw_sql("SET autocommit = 0"))
            .await
            .map_err(|e| ResetError::Database(e.to_string()))?;
        Ok(Box::new(MySqlSeedSession { conn: Some(conn) }))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.open().await?;
        let pinged = conn.ping().await;
        let _ = conn.close().await;
        pinged.map_err(|e| ResetError::DatabaseUnreachable {
            attempts: 1,
            reason: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

struct MySqlSeedSession {
    conn: Option<MySqlConnection>,
}

impl MySqlSeedSession {
    fn conn(&mut self) -> Result<&mut MySqlConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| ResetError::Database("connection already closed".to_string()))
    }
}

#[async_trait]
impl SeedSession for MySqlSeedSession {
    async fn execute(&mut self, statement: &str) -> std::result::Result<(), StatementError> {
        let conn = self.conn().map_err(|e| StatementError(e.to_string()))?;
        conn.execute(sqlx::raw_sql(statement))
            .await
            .map(|_| ())
            .map_err(|e| StatementError(e.to_string()))
    }

    async fn commit(&mut self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(sqlx::raw_sql("COMMIT"))
            .await
            .map(|_| ())
            .map_err(|e| ResetError::Database(e.to_string()))
    }

    async fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .await
                .map_err(|e| ResetError::Database(e.to_string())),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Startup wait
// ---------------------------------------------------------------------------

/// Block until `db` answers a ping, retrying per `policy`.
///
/// Returns `DatabaseUnreachable` carrying the last error once every attempt
/// has failed. No delay follows the final attempt.
pub async fn wait_for_database(db: &dyn SeedDatabase, policy: StartupProbe) -> Result<()> {
    let attempts = policy.retries.max(1);
    info!(target = %db.describe(), "waiting for database server to be ready");

    let mut last_error = String::new();
    for attempt in 1..=attempts {
        match db.ping().await {
            Ok(()) => {
                info!(attempt, "database server is ready");
                return Ok(());
            }
            Err(e) => {
                warn!(attempt, max = attempts, error = %e, "database not ready yet");
                last_error = match e {
                    ResetError::DatabaseUnreachable { reason, .. } => reason,
                    other => other.to_string(),
                };
                if attempt < attempts {
                    tokio::time::sleep(policy.retry_delay()).await;
                }
            }
        }
    }

    Err(ResetError::DatabaseUnreachable {
        attempts,
        reason: last_error,
    })
}
