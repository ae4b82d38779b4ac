/// Hash a password with bcrypt at the default cost.
pub fn hash(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Verify a password against a stored hash. A malformed hash counts as a
/// failed verification rather than an error.
pub fn verify(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash("hunter2").unwrap();
        assert!(verify("hunter2", &hashed));
        assert!(!verify("hunter3", &hashed));
    }

    #[test]
    fn malformed_hash_fails_verification() {
        assert!(!verify("hunter2", "not-a-bcrypt-hash"));
    }

    #[test]
    fn hashes_are_salted() {
        let h1 = hash("hunter2").unwrap();
        let h2 = hash("hunter2").unwrap();
        assert_ne!(h1, h2);
    }
}
