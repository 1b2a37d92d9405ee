use stashiq_types::models::User;

/// Database row type — maps directly to a SQLite row.
/// Distinct from the stashiq-types domain model to keep the DB layer independent.
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub role_id: i64,
    pub created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            email: row.email,
            role_id: row.role_id,
        }
    }
}
