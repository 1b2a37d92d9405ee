use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::warn;

/// Hash a password with Argon2id and a fresh random salt. The result is a
/// PHC-format string carrying the algorithm, parameters, and salt.
pub fn hash(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a candidate password against a stored PHC string.
///
/// Goes through the argon2 crate's verification routine, which re-derives
/// with the embedded salt and compares in constant time. A stored hash that
/// fails to parse counts as a mismatch; the cause is logged, never surfaced.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(h) => h,
        Err(e) => {
            warn!("Stored password hash failed to parse: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let h = hash("secret123").unwrap();
        assert!(verify("secret123", &h));
        assert!(!verify("wrong", &h));
        assert!(!verify("", &h));
    }

    #[test]
    fn verification_is_idempotent() {
        let h = hash("secret123").unwrap();
        assert!(verify("secret123", &h));
        assert!(verify("secret123", &h));
        assert!(!verify("secret124", &h));
        assert!(!verify("secret124", &h));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let a = hash("secret123").unwrap();
        let b = hash("secret123").unwrap();
        assert_ne!(a, b);
        assert!(verify("secret123", &a));
        assert!(verify("secret123", &b));
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        assert!(!verify("secret123", "not-a-phc-string"));
        assert!(!verify("secret123", ""));
    }
}
