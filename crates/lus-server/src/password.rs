//! Password hashing for the user directory.
//!
//! Single-round SHA-256 over a fixed process-wide salt, hex-encoded, and a
//! plain string-equality check. This is the declared security posture of a
//! local annotation tool, not production credential storage; the comparison
//! is not constant-time.

use sha2::{Digest, Sha256};

const PASSWORD_SALT: &str = "lus-labeler-demo-salt";

/// Hash a password with the fixed salt.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(format!("{PASSWORD_SALT}{password}").as_bytes());
    hex::encode(digest)
}

/// Check a plaintext password against a stored hash.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    hash_password(password) == hashed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash_password("secret"), hash_password("secret"));
    }

    #[test]
    fn hash_is_hex_sha256() {
        let h = hash_password("secret");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_passwords_differ() {
        assert_ne!(hash_password("secret"), hash_password("secret2"));
    }

    #[test]
    fn verify_round_trip() {
        let h = hash_password("hunter2");
        assert!(verify_password("hunter2", &h));
        assert!(!verify_password("hunter3", &h));
        assert!(!verify_password("hunter2", "not-a-hash"));
    }
}
