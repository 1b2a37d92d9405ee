use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use stashiq_types::models::{Session, User};

use crate::error::AuthError;
use crate::password;
use crate::session::SessionStore;

/// Read-only view of the persisted accounts, keyed by username.
///
/// The username is unique in storage, so a lookup yields at most one record.
/// Storage faults are errors — never conflated with "not found", so callers
/// can tell bad credentials apart from an unavailable backend.
pub trait CredentialStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

impl CredentialStore for stashiq_db::Database {
    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.get_user_by_username(username)?.map(Into::into))
    }
}

pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    // Verified against when the username has no record, so a lookup miss
    // costs the same argon2 run as a wrong password.
    miss_hash: String,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        let miss_hash = password::hash("stashiq.invalid")?;
        Ok(Self {
            store,
            sessions,
            miss_hash,
        })
    }

    /// Verify a credential pair and establish a session on success.
    ///
    /// Unknown username and wrong password return the same error. Input
    /// validation happens before any storage access.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MalformedRequest);
        }

        let user = self
            .store
            .find_by_username(username)
            .map_err(AuthError::StorageUnavailable)?;

        match user {
            Some(user) if password::verify(password, &user.password_hash) => {
                debug!(user_id = user.id, "Credentials verified");
                self.sessions.issue(user.id).map_err(AuthError::Internal)
            }
            Some(_) => Err(AuthError::InvalidCredentials),
            None => {
                password::verify(password, &self.miss_hash);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Resolve a session token to the user id it authenticates as.
    /// Does not touch session state beyond the read.
    pub fn authorize(&self, token: &str) -> Result<i64, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        self.sessions
            .resolve(token)
            .map_err(AuthError::Internal)?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Destroy the session behind `token`. Revoking an already-dead token
    /// is not an error.
    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.revoke(token).map_err(AuthError::Internal)?;
        Ok(())
    }
}
