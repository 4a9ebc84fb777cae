use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Salted SHA-256 digest of a password or security answer, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretHash {
    pub hash: String,
    pub salt: String,
}

fn digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn hash_secret(secret: &str) -> SecretHash {
    let salt = Uuid::new_v4().simple().to_string();
    SecretHash {
        hash: digest(&salt, secret),
        salt,
    }
}

pub fn verify_secret(secret: &str, hash: &str, salt: &str) -> bool {
    let candidate = digest(salt, secret);
    if candidate.len() != hash.len() {
        return false;
    }
    // Compare every byte so timing does not depend on the first mismatch
    candidate
        .bytes()
        .zip(hash.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Security answers are compared case- and whitespace-insensitively.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_secret() {
        let stored = hash_secret("hunter22");
        assert!(verify_secret("hunter22", &stored.hash, &stored.salt));
        assert!(!verify_secret("hunter23", &stored.hash, &stored.salt));
    }

    #[test]
    fn salts_differ_per_hash() {
        let a = hash_secret("same");
        let b = hash_secret("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn normalizes_answers() {
        assert_eq!(normalize_answer("  Rex \n"), "rex");
    }
}
