use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use botforge_core::error::ProvisionError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`ProvisionError`] for domain errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `botforge_core`.
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- ProvisionError variants ---
            AppError::Provision(err) => match err {
                ProvisionError::GateRejected => (
                    StatusCode::FORBIDDEN,
                    "GATE_REJECTED",
                    "Required memberships are not satisfied".to_string(),
                ),
                ProvisionError::TemplateNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Template with id {id} not found"),
                ),
                ProvisionError::InstanceNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Instance with id {id} not found"),
                ),
                ProvisionError::SpawnFailed(io_err) => {
                    tracing::error!(error = %io_err, "Instance process spawn failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SPAWN_FAILED",
                        "Failed to launch the instance process".to_string(),
                    )
                }
                ProvisionError::StorageWriteFailed(io_err) => {
                    tracing::error!(error = %io_err, "Instance storage write failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
                ProvisionError::Catalog(msg) => {
                    tracing::error!(error = %msg, "Catalog error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn row_not_found_maps_to_404() {
        let (status, code, _) = classify_sqlx_error(&sqlx::Error::RowNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn unclassified_database_errors_are_sanitized_500s() {
        let (status, code, message) = classify_sqlx_error(&sqlx::Error::PoolClosed);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
        // The raw error text must not leak to the client.
        assert_eq!(message, "An internal error occurred");
    }

    #[test]
    fn gate_rejection_maps_to_403() {
        let response = AppError::Provision(ProvisionError::GateRejected).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_variants_map_to_404() {
        let id = Uuid::new_v4();
        for err in [
            ProvisionError::TemplateNotFound(id),
            ProvisionError::InstanceNotFound(id),
        ] {
            let response = AppError::Provision(err).into_response();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn spawn_failure_maps_to_502() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no runtime");
        let response = AppError::Provision(ProvisionError::SpawnFailed(io_err)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
