use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use stashiq_api::{AppStateInner, Authenticator, MemorySessionStore, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stashiq=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("STASHIQ_DB_PATH").unwrap_or_else(|_| "stashiq.db".into());
    let host = std::env::var("STASHIQ_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("STASHIQ_PORT")
        .unwrap_or_else(|_| "5000".into())
        .parse()?;
    let session_ttl_secs: u64 = std::env::var("STASHIQ_SESSION_TTL_SECS")
        .unwrap_or_else(|_| "86400".into())
        .parse()?;

    // Init user store
    let db = stashiq_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let sessions = Arc::new(MemorySessionStore::new(Duration::from_secs(
        session_ttl_secs,
    )));
    let authenticator = Authenticator::new(Arc::new(db), sessions.clone())?;
    let state = Arc::new(AppStateInner { authenticator });

    // Sweep expired sessions so time-dead entries don't accumulate between reads
    let sweep = sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            match sweep.purge_expired() {
                Ok(0) => {}
                Ok(n) => info!("Purged {} expired sessions", n),
                Err(e) => warn!("Session sweep failed: {}", e),
            }
        }
    });

    // CORS stays permissive: the frontend is served from a different origin
    let app = stashiq_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("StashIQ auth server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
