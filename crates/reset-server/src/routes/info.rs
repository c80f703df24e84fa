use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET / — service metadata and a configuration echo.
pub async fn get_info(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "CTF Database Reset & Watchdog Service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health_check": "GET /health",
            "manual_reset": "POST /reset",
            "info": "GET /",
        },
        "configuration": {
            "mysql_host": app.config.database.host,
            "reset_interval_minutes": app.config.reset_interval_minutes(),
            "automatic_reset": true,
        },
    }))
}
