use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::AuthError;

/// The authenticated identity, inserted by `require_session` for handlers
/// downstream. Carries the token so logout can revoke it.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub token: String,
}

/// Extract the bearer token and validate it against the session store.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::Unauthenticated)?
        .to_string();

    let user_id = state.authenticator.authorize(&token)?;

    req.extensions_mut().insert(CurrentUser { id: user_id, token });
    Ok(next.run(req).await)
}
