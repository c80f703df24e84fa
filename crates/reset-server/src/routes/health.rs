use axum::extract::State;
use axum::Json;

use crate::routes::SERVICE_NAME;
use crate::state::AppState;

/// GET /health — reset counters. Never waits for an in-flight reset.
pub async fn get_health(State(app): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = app.executor.snapshot();

    Json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "last_reset": snapshot.last_reset_display(),
        "reset_count": snapshot.reset_count,
        "seconds_since_last_reset": snapshot.seconds_since_last_reset(chrono::Utc::now()),
        "reset_interval_seconds": app.config.reset_interval_secs,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reset_core::config::ResetConfig;
    use reset_core::executor::ResetExecutor;
    use reset_core::test_support::MemoryDatabase;
    use std::sync::Arc;

    fn app(seed: &std::path::Path, interval: u64) -> AppState {
        let executor = Arc::new(ResetExecutor::new(Arc::new(MemoryDatabase::new()), seed));
        AppState::new(
            executor,
            ResetConfig {
                reset_interval_secs: interval,
                ..ResetConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn reports_never_before_first_reset() {
        let dir = tempfile::TempDir::new().unwrap();
        let json = get_health(State(app(&dir.path().join("init.sql"), 900))).await.0;

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["last_reset"], "Never");
        assert_eq!(json["reset_count"], 0);
        assert!(json["seconds_since_last_reset"].is_null());
        assert_eq!(json["reset_interval_seconds"], 900);
    }

    #[tokio::test]
    async fn reports_counters_after_a_reset() {
        let dir = tempfile::TempDir::new().unwrap();
        let seed = dir.path().join("init.sql");
        std::fs::write(&seed, "SELECT 1;").unwrap();
        let state = app(&seed, 60);
        let report = state.executor.reset().await.unwrap();

        let json = get_health(State(state)).await.0;

        assert_eq!(json["reset_count"], 1);
        assert_eq!(
            json["last_reset"],
            reset_core::state::format_timestamp(report.completed_at)
        );
        assert!(json["seconds_since_last_reset"].as_f64().unwrap() >= 0.0);
        assert_eq!(json["reset_interval_seconds"], 60);
    }
}
