use serde::{Deserialize, Serialize};

/// A registered account as the authentication core sees it.
///
/// `password_hash` is a PHC-format string and is opaque to everything except
/// the hashing routines. It never appears in API responses — none of the
/// serializable response types carry it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub role_id: i64,
}

/// An established session: opaque token bound to a user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
}
