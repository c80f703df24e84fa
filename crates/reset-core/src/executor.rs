//! Single-flight database reset.
//!
//! `ResetExecutor::reset` holds the reset gate for its whole body, so a
//! scheduled reset and any number of manual triggers run strictly one after
//! another. Callers queue on the gate; nothing is coalesced. Once a caller
//! owns the gate the reset runs to completion even if that caller goes away.
//!
//! Counters live behind a separate short lock that is only written while the
//! gate is held. Readers (the status endpoint) never wait for an in-flight
//! reset.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::db::{SeedDatabase, SeedSession};
use crate::error::{ResetError, Result};
use crate::seed::SeedScript;
use crate::state::ResetState;

// ---------------------------------------------------------------------------
// ResetReport
// ---------------------------------------------------------------------------

/// Outcome of one successful reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetReport {
    /// Statements parsed from the seed file.
    pub statements: usize,
    pub executed: usize,
    /// Statements the server rejected; logged and skipped.
    pub skipped: usize,
    pub reset_count: u64,
    pub completed_at: DateTime<Utc>,
}

impl ResetReport {
    pub fn message(&self) -> String {
        format!(
            "Database reset completed successfully (Reset #{})",
            self.reset_count
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Applied {
    statements: usize,
    executed: usize,
    skipped: usize,
}

// ---------------------------------------------------------------------------
// ResetExecutor
// ---------------------------------------------------------------------------

pub struct ResetExecutor {
    db: Arc<dyn SeedDatabase>,
    seed_path: PathBuf,
    gate: Arc<Mutex<()>>,
    state: Arc<RwLock<ResetState>>,
}

impl ResetExecutor {
    pub fn new(db: Arc<dyn SeedDatabase>, seed_path: impl Into<PathBuf>) -> Self {
        Self {
            db,
            seed_path: seed_path.into(),
            gate: Arc::new(Mutex::new(())),
            state: Arc::new(RwLock::new(ResetState::default())),
        }
    }

    pub fn seed_path(&self) -> &Path {
        &self.seed_path
    }

    pub fn database(&self) -> &dyn SeedDatabase {
        self.db.as_ref()
    }

    /// Current counters. May be one reset behind while a reset is running.
    pub fn snapshot(&self) -> ResetState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reload the database from the seed file.
    ///
    /// The reset body runs on its own task that owns the gate guard, so
    /// dropping the returned future (a disconnected HTTP client) neither
    /// releases the gate early nor loses the counter update. A panic inside
    /// the body comes back as `ResetError::Unexpected`.
    pub async fn reset(&self) -> Result<ResetReport> {
        let gate = Arc::clone(&self.gate).lock_owned().await;
        let db = Arc::clone(&self.db);
        let state = Arc::clone(&self.state);
        let seed_path = self.seed_path.clone();

        let joined = tokio::spawn(async move {
            let _gate = gate;
            run_reset(db.as_ref(), &seed_path, &state).await
        })
        .await;

        match joined {
            Ok(outcome) => outcome,
            Err(join_error) => {
                let e = ResetError::Unexpected(if join_error.is_panic() {
                    panic_message(join_error.into_panic())
                } else {
                    join_error.to_string()
                });
                error!(error = %e, "database reset failed");
                Err(e)
            }
        }
    }
}

/// One full reset. Must only run while the gate is held.
async fn run_reset(
    db: &dyn SeedDatabase,
    seed_path: &Path,
    state: &RwLock<ResetState>,
) -> Result<ResetReport> {
    info!(seed = %seed_path.display(), "starting database reset");

    let applied = match SeedScript::load(seed_path) {
        Ok(script) => apply_script(db, script).await,
        Err(e) => Err(e),
    };
    let applied = match applied {
        Ok(applied) => applied,
        Err(e) => {
            error!(error = %e, "database reset failed");
            return Err(e);
        }
    };

    let completed_at = Utc::now();
    let reset_count = state
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .record_success(completed_at);

    let report = ResetReport {
        statements: applied.statements,
        executed: applied.executed,
        skipped: applied.skipped,
        reset_count,
        completed_at,
    };
    info!(
        executed = report.executed,
        skipped = report.skipped,
        "{}",
        report.message()
    );
    Ok(report)
}

async fn apply_script(db: &dyn SeedDatabase, script: SeedScript) -> Result<Applied> {
    let mut session = db.connect().await?;
    let applied = run_statements(session.as_mut(), script).await;
    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close seed connection");
    }
    applied
}

async fn run_statements(session: &mut dyn SeedSession, script: SeedScript) -> Result<Applied> {
    let statements = script.len();
    info!(statements, "executing SQL statements");

    let mut executed = 0;
    let mut skipped = 0;
    for (idx, statement) in script.into_iter().enumerate() {
        match session.execute(&statement).await {
            Ok(()) => executed += 1,
            Err(e) => {
                skipped += 1;
                warn!(statement = idx + 1, error = %e, "statement failed, skipping");
            }
        }
    }

    session.commit().await?;
    Ok(Applied {
        statements,
        executed,
        skipped,
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "reset task panicked".to_string()
    }
}
