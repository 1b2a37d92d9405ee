pub mod authenticator;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod session;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

pub use authenticator::{Authenticator, CredentialStore};
pub use error::AuthError;
pub use session::{MemorySessionStore, SessionStore};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub authenticator: Authenticator,
}

/// Assemble the API routes: login is public, everything else sits behind
/// the session middleware.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/login", post(handlers::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/logout", post(handlers::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
