use crate::Database;
use crate::models::UserRow;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    /// Insert a new account and return its assigned id. Registration has no
    /// public endpoint; this exists for seeding and tests.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        role_id: i64,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash, email, role_id) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![username, password_hash, email, role_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, email, role_id, created_at
         FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                email: row.get(3)?,
                role_id: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, email, role_id, created_at
         FROM users WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                email: row.get(3)?,
                role_id: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn create_and_find_by_username() {
        let db = db();
        let id = db
            .create_user("alice", "$argon2id$stub", Some("alice@example.com"), 1)
            .unwrap();

        let row = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.username, "alice");
        assert_eq!(row.password_hash, "$argon2id$stub");
        assert_eq!(row.email.as_deref(), Some("alice@example.com"));
        assert_eq!(row.role_id, 1);
    }

    #[test]
    fn find_unknown_username_is_none() {
        let db = db();
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn usernames_are_case_sensitive_and_unique() {
        let db = db();
        db.create_user("alice", "h1", None, 1).unwrap();

        // Different case is a different user
        db.create_user("Alice", "h2", None, 1).unwrap();
        assert_eq!(
            db.get_user_by_username("Alice").unwrap().unwrap().password_hash,
            "h2"
        );

        // Exact duplicate violates the unique constraint
        assert!(db.create_user("alice", "h3", None, 1).is_err());
    }

    #[test]
    fn find_by_id_roundtrip() {
        let db = db();
        let id = db.create_user("bob", "h", None, 2).unwrap();
        let row = db.get_user_by_id(id).unwrap().unwrap();
        assert_eq!(row.username, "bob");
        assert_eq!(row.role_id, 2);
        assert!(db.get_user_by_id(id + 1000).unwrap().is_none());
    }
}
