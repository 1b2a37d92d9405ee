use axum::{Extension, Json, extract::State};
use tracing::info;

use stashiq_types::api::{LoginRequest, LoginResponse, MessageResponse};

use crate::AppState;
use crate::error::AuthError;
use crate::middleware::CurrentUser;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    // Argon2 verification is deliberately slow; keep it off the async workers.
    let auth = state.clone();
    let session = tokio::task::spawn_blocking(move || {
        auth.authenticator.login(&req.username, &req.password)
    })
    .await
    .map_err(|e| AuthError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e)))??;

    info!(user_id = session.user_id, "Login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        user_id: session.user_id,
        token: session.token,
    }))
}

pub async fn dashboard(Extension(user): Extension<CurrentUser>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Welcome to StashIQ Dashboard, User ID: {}", user.id),
    })
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<MessageResponse>, AuthError> {
    state.authenticator.logout(&user.token)?;

    info!(user_id = user.id, "Logged out");

    Ok(Json(MessageResponse {
        message: "Logged out".into(),
    }))
}
