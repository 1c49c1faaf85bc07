use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// SHA-256 hex digest of `salt || text`. Pure, no side effects.
pub fn hash_text(text: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a fresh 16-byte salt, hex encoded.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a secret with the given salt, or with a freshly generated one when
/// none is supplied. Returns `(digest, salt)`. Used for both passwords and
/// security answers.
pub fn hash_password(password: &str, salt: Option<&str>) -> (String, String) {
    let salt = match salt {
        Some(existing) => existing.to_string(),
        None => generate_salt(),
    };
    (hash_text(password, &salt), salt)
}

/// Opaque identifier for new user records (8 random bytes, hex encoded).
pub fn generate_user_id() -> String {
    let mut bytes = [0u8; 8];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// URL-safe recovery token with 16 bytes of entropy.
pub fn generate_recovery_token() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Equality check whose running time does not depend on where the first
/// differing byte occurs. Must be used for every secret comparison.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_text_is_deterministic() {
        let first = hash_text("secret", "abcd");
        let second = hash_text("secret", "abcd");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_text_depends_on_salt() {
        assert_ne!(hash_text("secret", "aaaa"), hash_text("secret", "bbbb"));
    }

    #[test]
    fn test_hash_password_reuses_supplied_salt() {
        let (digest, salt) = hash_password("secret", None);
        let (again, same_salt) = hash_password("secret", Some(&salt));
        assert_eq!(digest, again);
        assert_eq!(salt, same_salt);
    }

    #[test]
    fn test_hash_password_generates_fresh_salts() {
        let (_, first) = hash_password("secret", None);
        let (_, second) = hash_password("secret", None);
        assert_eq!(first.len(), 32);
        assert_ne!(first, second);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("token-123", "token-123"));
        assert!(!constant_time_eq("token-123", "token-124"));
        assert!(!constant_time_eq("short", "much longer value"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_recovery_token_is_url_safe() {
        let token = generate_recovery_token();
        assert!(!token.is_empty());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_user_id_shape() {
        let id = generate_user_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
