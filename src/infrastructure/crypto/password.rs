//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::warn;

use crate::domain::{AccountError, AccountResult, CredentialChecker};

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// bcrypt-backed [`CredentialChecker`]
#[derive(Debug, Clone, Copy)]
pub struct BcryptCredentials {
    cost: u32,
}

impl BcryptCredentials {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl CredentialChecker for BcryptCredentials {
    fn hash(&self, secret: &str) -> AccountResult<String> {
        hash_password(secret, self.cost)
            .map_err(|e| AccountError::Store(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, secret: &str, hash: &str) -> bool {
        match verify_password(secret, hash) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Stored password hash could not be read: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hashed = hash_password(password, bcrypt::DEFAULT_COST).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn checker_round_trip() {
        let checker = BcryptCredentials::new(4);
        let hashed = checker.hash("s3cret").unwrap();
        assert_ne!(hashed, "s3cret");
        assert!(checker.verify("s3cret", &hashed));
        assert!(!checker.verify("S3cret", &hashed));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let checker = BcryptCredentials::new(4);
        assert!(!checker.verify("s3cret", "not-a-bcrypt-hash"));
        assert!(!checker.verify("", ""));
    }
}
