//! Request-level error type.
//!
//! Handlers return `Result<T, ServerError>`. Client errors echo their message;
//! storage and template failures are logged in full and answered with a
//! generic body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clarity_core::ReflectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The form was missing a required field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The reflection provider failed and degradation is disabled.
    #[error("reflection error: {0}")]
    Reflection(#[from] ReflectionError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Reflection(_) => StatusCode::BAD_GATEWAY,
            ServerError::Database(_) | ServerError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ServerError::BadRequest(m) => m.clone(),
            ServerError::Reflection(e) => {
                tracing::error!(error = %e, "Reflection generation failed");
                "reflection service unavailable".to_string()
            }
            ServerError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "internal server error".to_string()
            }
            ServerError::Template(e) => {
                tracing::error!(error = %e, "Template rendering failed");
                "internal server error".to_string()
            }
        };
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServerError::BadRequest("entry field is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::Reflection(ReflectionError::MissingApiKey).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ServerError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_database_detail_is_not_exposed() {
        let detail = sqlx::Error::RowNotFound.to_string();
        let resp = ServerError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(text, "internal server error");
        assert!(!text.contains(&detail));
    }
}
