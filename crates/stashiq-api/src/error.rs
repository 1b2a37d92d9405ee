use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Authentication error taxonomy. Unknown-username and wrong-password both
/// map to `InvalidCredentials` — distinguishing them would let a caller
/// enumerate valid usernames.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username and password required")]
    MalformedRequest,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Please log in first.")]
    Unauthenticated,

    #[error("Service temporarily unavailable")]
    StorageUnavailable(anyhow::Error),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MalformedRequest => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Unauthenticated => StatusCode::FORBIDDEN,
            AuthError::StorageUnavailable(e) => {
                error!("Credential store unavailable: {:#}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
            AuthError::Internal(e) => {
                error!("Internal error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Only the stable message leaves the process; sources stay in the log.
        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
