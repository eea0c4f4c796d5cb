use crate::domain::AccountResult;

/// Hashes secrets and compares candidates against stored hashes.
pub trait CredentialChecker: Send + Sync {
    fn hash(&self, secret: &str) -> AccountResult<String>;

    /// `false` for a mismatch or an unreadable hash.
    fn verify(&self, secret: &str, hash: &str) -> bool;
}
