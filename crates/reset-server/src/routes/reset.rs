use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// POST /reset — run one full reset now.
///
/// Waits behind any reset already in progress, then performs its own.
pub async fn trigger_reset(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    info!("manual reset triggered via HTTP POST /reset");

    let report = app.executor.reset().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": report.message(),
        "reset_count": report.reset_count,
        "timestamp": reset_core::state::format_timestamp(report.completed_at),
        "statements_executed": report.executed,
        "statements_skipped": report.skipped,
    })))
}
