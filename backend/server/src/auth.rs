//! # Admin Login
//!
//! One fixed admin identity, bcrypt hash in config. No session is issued, each call is a standalone check.
//!
//! Wrong email and wrong password fail the same way, and the hash is verified even when the email is already
//! wrong so both paths cost about the same.
use tokio::task::spawn_blocking;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct AdminCredentials {
    pub email: String,
    pub password_hash: String,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn check(&self, email: &str, password: &str) -> bool {
        let email_matches = email == self.email;

        let password_matches = bcrypt::verify(password, &self.password_hash)
            .unwrap_or_else(|e| {
                warn!("Admin password hash unusable: {e}");
                false
            });

        email_matches && password_matches
    }

    /// Runs [`Self::check`] on the blocking pool, bcrypt is deliberately slow.
    pub async fn verify(&self, email: String, password: String) -> bool {
        let credentials = self.clone();

        spawn_blocking(move || credentials.check(&email, &password))
            .await
            .unwrap_or_else(|e| {
                warn!("Credential check aborted: {e}");
                false
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> AdminCredentials {
        AdminCredentials::new("admin@example.com", bcrypt::hash("hunter2", 4).unwrap())
    }

    #[test]
    fn test_correct_credentials() {
        assert!(credentials().check("admin@example.com", "hunter2"));
    }

    #[test]
    fn test_wrong_password() {
        assert!(!credentials().check("admin@example.com", "hunter3"));
    }

    #[test]
    fn test_wrong_email() {
        assert!(!credentials().check("someone@example.com", "hunter2"));
        assert!(!credentials().check("ADMIN@example.com", "hunter2"));
    }

    #[test]
    fn test_malformed_hash_rejects() {
        let credentials = AdminCredentials::new("admin@example.com", "not-a-bcrypt-hash");

        assert!(!credentials.check("admin@example.com", "anything"));
    }

    #[tokio::test]
    async fn test_verify_on_blocking_pool() {
        let credentials = credentials();
        let email = "admin@example.com";

        assert!(credentials.verify(email.into(), "hunter2".into()).await);
        assert!(!credentials.verify(email.into(), "".into()).await);
    }
}
