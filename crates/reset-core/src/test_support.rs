//! In-memory `SeedDatabase` for exercising the executor without MySQL.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::db::{SeedDatabase, SeedSession, StatementError};
use crate::error::{ResetError, Result};

#[derive(Default)]
struct Inner {
    executed: Mutex<Vec<String>>,
    failing_prefixes: Mutex<Vec<String>>,
    panic_prefix: Mutex<Option<String>>,
    statement_delay: Mutex<Duration>,
    refuse_remaining: AtomicU32,
    fail_commit: AtomicBool,
    connect_attempts: AtomicU32,
    commits: AtomicU32,
    sessions_closed: AtomicU32,
    open_sessions: AtomicUsize,
    max_open_sessions: AtomicUsize,
}

/// Records every statement it is asked to run. Cheap to clone; clones share
/// the same recording.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<Inner>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements starting with `prefix` (case-insensitive) are rejected.
    pub fn fail_statements_starting_with(&self, prefix: &str) {
        self.inner
            .failing_prefixes
            .lock()
            .unwrap()
            .push(prefix.to_ascii_uppercase());
    }

    /// Panic while executing a statement starting with `prefix`.
    pub fn panic_on_statement_starting_with(&self, prefix: &str) {
        *self.inner.panic_prefix.lock().unwrap() = Some(prefix.to_ascii_uppercase());
    }

    /// Refuse the next `count` connection attempts. `u32::MAX` refuses forever.
    pub fn refuse_connections(&self, count: u32) {
        self.inner.refuse_remaining.store(count, Ordering::SeqCst);
    }

    pub fn fail_commit(&self) {
        self.inner.fail_commit.store(true, Ordering::SeqCst);
    }

    /// Sleep this long inside every statement, so overlapping resets would
    /// be observable.
    pub fn set_statement_delay(&self, delay: Duration) {
        *self.inner.statement_delay.lock().unwrap() = delay;
    }

    pub fn executed(&self) -> Vec<String> {
        self.inner.executed.lock().unwrap().clone()
    }

    pub fn connect_attempts(&self) -> u32 {
        self.inner.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> u32 {
        self.inner.commits.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> u32 {
        self.inner.sessions_closed.load(Ordering::SeqCst)
    }

    /// Highest number of sessions that were open at the same time.
    pub fn max_open_sessions(&self) -> usize {
        self.inner.max_open_sessions.load(Ordering::SeqCst)
    }

    fn take_refusal(&self) -> bool {
        self.inner
            .refuse_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                0 => None,
                u32::MAX => Some(u32::MAX),
                n => Some(n - 1),
            })
            .is_ok()
    }
}

fn matches_prefix(statement: &str, prefix: &str) -> bool {
    statement.to_ascii_uppercase().starts_with(prefix)
}

#[async_trait]
impl SeedDatabase for MemoryDatabase {
    async fn connect(&self) -> Result<Box<dyn SeedSession>> {
        self.inner.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if self.take_refusal() {
            return Err(ResetError::DatabaseUnreachable {
                attempts: 1,
                reason: "Can't connect to MySQL server on 'memory' (111)".to_string(),
            });
        }
        let open = self.inner.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.max_open_sessions.fetch_max(open, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            inner: Arc::clone(&self.inner),
            closed: false,
        }))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

struct MemorySession {
    inner: Arc<Inner>,
    closed: bool,
}

impl MemorySession {
    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.inner.open_sessions.fetch_sub(1, Ordering::SeqCst);
            self.inner.sessions_closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl SeedSession for MemorySession {
    async fn execute(&mut self, statement: &str) -> std::result::Result<(), StatementError> {
        let delay = *self.inner.statement_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let panic_prefix = self.inner.panic_prefix.lock().unwrap().clone();
        if let Some(prefix) = panic_prefix {
            if matches_prefix(statement, &prefix) {
                panic!("injected failure on '{statement}'");
            }
        }

        let rejected = self
            .inner
            .failing_prefixes
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| matches_prefix(statement, prefix));
        if rejected {
            return Err(StatementError(format!(
                "(1295, 'This command is not supported: {statement}')"
            )));
        }

        self.inner
            .executed
            .lock()
            .unwrap()
            .push(statement.to_string());
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.inner.fail_commit.load(Ordering::SeqCst) {
            return Err(ResetError::Database(
                "(2013, 'Lost connection to MySQL server during query')".to_string(),
            ));
        }
        self.inner.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.release();
        Ok(())
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.release();
    }
}
