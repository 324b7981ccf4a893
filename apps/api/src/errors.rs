use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to store reading: {0}")]
    StoreWrite(#[source] sqlx::Error),

    #[error("Failed to load latest reading: {0}")]
    StoreRead(#[source] sqlx::Error),
}

impl AppError {
    /// Message returned to the caller. Store details stay in the server log.
    fn public_message(&self) -> &'static str {
        match self {
            AppError::StoreWrite(_) => "failed to store sensor data",
            AppError::StoreRead(_) => "failed to query sensor data",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::StoreWrite(e) => tracing::error!("Database write error: {e}"),
            AppError::StoreRead(e) => tracing::error!("Database read error: {e}"),
        }

        let body = Json(json!({ "error": self.public_message() }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_500_without_detail() {
        let response = AppError::StoreRead(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_public_message_does_not_leak_source() {
        let err = AppError::StoreWrite(sqlx::Error::Protocol("secret host 10.0.0.5".into()));
        assert!(err.to_string().contains("10.0.0.5"));
        assert!(!err.public_message().contains("10.0.0.5"));
    }
}
