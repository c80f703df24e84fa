use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::executor::ResetExecutor;

/// Spawn the periodic reset loop. It sleeps `interval`, resets, and repeats
/// for as long as the runtime lives. Failures are logged; the loop carries on.
pub fn spawn(executor: Arc<ResetExecutor>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(run(executor, interval))
}

async fn run(executor: Arc<ResetExecutor>, interval: Duration) {
    info!(
        interval_secs = interval.as_secs(),
        "periodic reset task started ({:.1} minutes)",
        interval.as_secs_f64() / 60.0
    );

    loop {
        tokio::time::sleep(interval).await;
        info!("scheduled reset triggered");
        match executor.reset().await {
            Ok(report) => info!(reset_count = report.reset_count, "scheduled reset finished"),
            Err(e) => error!(error = %e, "scheduled reset failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryDatabase;
    use tempfile::TempDir;

    #[tokio::test(start_paused = true)]
    async fn resets_once_per_interval() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("init.sql");
        std::fs::write(&path, "SELECT 1;").unwrap();
        let db = MemoryDatabase::new();
        let executor = Arc::new(ResetExecutor::new(Arc::new(db.clone()), path));

        let handle = spawn(Arc::clone(&executor), Duration::from_secs(900));

        tokio::time::sleep(Duration::from_secs(899)).await;
        assert_eq!(executor.snapshot().reset_count, 0);

        tokio::time::sleep(Duration::from_secs(902)).await;
        assert_eq!(executor.snapshot().reset_count, 2);
        assert_eq!(db.executed().len(), 2);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_running_after_a_failed_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("init.sql");
        let db = MemoryDatabase::new();
        let executor = Arc::new(ResetExecutor::new(Arc::new(db.clone()), path.clone()));

        let handle = spawn(Arc::clone(&executor), Duration::from_secs(60));

        // First tick: seed file absent.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(executor.snapshot().reset_count, 0);

        std::fs::write(&path, "SELECT 1;").unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(executor.snapshot().reset_count, 1);
        assert!(!handle.is_finished());

        handle.abort();
    }
}
