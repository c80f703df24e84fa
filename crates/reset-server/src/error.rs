use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure surfaced to HTTP callers as `{status: "error", message}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": "error",
            "message": self.0.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reset_core::ResetError;
    use std::path::PathBuf;

    #[test]
    fn seed_file_missing_maps_to_500() {
        let err = AppError::from(ResetError::SeedFileMissing(PathBuf::from("/x/init.sql")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unreachable_database_maps_to_500() {
        let err = AppError::from(ResetError::DatabaseUnreachable {
            attempts: 1,
            reason: "connection refused".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_reset_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_is_json() {
        let err = AppError::from(ResetError::Unexpected("boom".into()));
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
