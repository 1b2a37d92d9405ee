use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use rand_core::{OsRng, RngCore};

use stashiq_types::models::Session;

/// Server-side session state: an opaque token bound to a user id.
///
/// Injected into the `Authenticator` rather than living in ambient process
/// globals, so an external backend can replace the in-memory map without
/// touching the core.
pub trait SessionStore: Send + Sync {
    /// Create a session for `user_id` and return it with a fresh token.
    fn issue(&self, user_id: i64) -> Result<Session>;

    /// Look up a live session. Expired sessions count as absent.
    fn resolve(&self, token: &str) -> Result<Option<i64>>;

    /// Destroy a session. Returns whether one existed.
    fn revoke(&self, token: &str) -> Result<bool>;

    /// Drop all expired sessions, returning how many were removed.
    fn purge_expired(&self) -> Result<usize>;
}

struct SessionEntry {
    user_id: i64,
    expires_at: Instant,
}

/// Mutex-guarded map of live sessions with a fixed TTL.
pub struct MemorySessionStore {
    ttl: Duration,
    inner: Mutex<HashMap<String, SessionEntry>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SessionEntry>>> {
        self.inner
            .lock()
            .map_err(|e| anyhow::anyhow!("session store lock poisoned: {}", e))
    }
}

impl SessionStore for MemorySessionStore {
    fn issue(&self, user_id: i64) -> Result<Session> {
        let token = generate_token();
        let entry = SessionEntry {
            user_id,
            expires_at: Instant::now() + self.ttl,
        };

        self.lock()?.insert(token.clone(), entry);
        Ok(Session { token, user_id })
    }

    fn resolve(&self, token: &str) -> Result<Option<i64>> {
        let mut sessions = self.lock()?;

        match sessions.get(token) {
            Some(entry) if Instant::now() < entry.expires_at => Ok(Some(entry.user_id)),
            Some(_) => {
                // Expired: drop it now rather than waiting for the sweep.
                sessions.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn revoke(&self, token: &str) -> Result<bool> {
        Ok(self.lock()?.remove(token).is_some())
    }

    fn purge_expired(&self) -> Result<usize> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        let now = Instant::now();
        sessions.retain(|_, entry| now < entry.expires_at);
        Ok(before - sessions.len())
    }
}

/// 256 bits from the OS RNG, base64url. Unguessable and free of URL/header
/// metacharacters.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    B64.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemorySessionStore {
        MemorySessionStore::new(Duration::from_secs(3600))
    }

    #[test]
    fn issue_then_resolve() {
        let store = store();
        let session = store.issue(1).unwrap();
        assert_eq!(session.user_id, 1);
        assert_eq!(store.resolve(&session.token).unwrap(), Some(1));
    }

    #[test]
    fn unknown_token_is_absent() {
        let store = store();
        store.issue(1).unwrap();
        assert_eq!(store.resolve("garbage").unwrap(), None);
    }

    #[test]
    fn tokens_are_unique() {
        let store = store();
        let a = store.issue(1).unwrap();
        let b = store.issue(1).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn revoke_destroys_the_session() {
        let store = store();
        let session = store.issue(7).unwrap();
        assert!(store.revoke(&session.token).unwrap());
        assert_eq!(store.resolve(&session.token).unwrap(), None);
        assert!(!store.revoke(&session.token).unwrap());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let store = MemorySessionStore::new(Duration::ZERO);
        let session = store.issue(1).unwrap();
        assert_eq!(store.resolve(&session.token).unwrap(), None);
    }

    #[test]
    fn purge_removes_only_expired_entries() {
        let expired = MemorySessionStore::new(Duration::ZERO);
        expired.issue(1).unwrap();
        expired.issue(2).unwrap();
        assert_eq!(expired.purge_expired().unwrap(), 2);

        let live = store();
        live.issue(1).unwrap();
        assert_eq!(live.purge_expired().unwrap(), 0);
    }
}
