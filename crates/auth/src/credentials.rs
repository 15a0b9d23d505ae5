//! Single-account credential check.
//!
//! Demo deployments run without an authentication server. They accept exactly
//! one configured account whose password is only known as a SHA-256 digest.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use entities::User;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::{AuthError, AuthResult};

/// Email and password entered by a user.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Computes the digest stored in configuration for `password`.
///
/// The digest is base64url (no padding) of SHA-256 over the UTF-8 bytes.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// The one account accepted by a demo deployment.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    email: String,
    password_digest: String,
    user: User,
}

impl StaticCredentials {
    /// Creates a credential check for `email` and a password with the given
    /// digest. `user` is the profile signed in on success.
    pub fn new(email: impl Into<String>, password_digest: impl Into<String>, user: User) -> Self {
        Self {
            email: email.into(),
            password_digest: password_digest.into(),
            user,
        }
    }

    /// Checks `credentials` and returns the configured profile on success.
    pub fn verify(&self, credentials: &Credentials) -> AuthResult<User> {
        let email_matches = credentials.email.eq_ignore_ascii_case(&self.email);
        let password_matches: bool = password_digest(&credentials.password)
            .as_bytes()
            .ct_eq(self.password_digest.as_bytes())
            .into();

        if email_matches && password_matches {
            Ok(self.user.clone())
        } else {
            debug!(email = %credentials.email, "Static credential check failed");
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_account() -> StaticCredentials {
        StaticCredentials::new(
            "demo@scenesplit.com",
            password_digest("let-me-in"),
            User::registered("Demo User", "ADMIN", "demo@scenesplit.com"),
        )
    }

    #[test]
    fn test_password_digest() {
        // SHA-256("abc") in base64url.
        assert_eq!(
            password_digest("abc"),
            "ungWv48Bz-pBQUDeXa4iI7ADYaOWF3qctBD_YfIAFa0"
        );
        assert_ne!(password_digest("abc"), password_digest("abd"));
    }

    #[test]
    fn test_verify_accepts_configured_account() {
        let account = demo_account();

        let user = account
            .verify(&Credentials::new("demo@scenesplit.com", "let-me-in"))
            .unwrap();
        assert_eq!(user.name, "Demo User");

        // Email comparison ignores case.
        assert!(account
            .verify(&Credentials::new("Demo@SceneSplit.com", "let-me-in"))
            .is_ok());
    }

    #[test]
    fn test_verify_rejects_everything_else() {
        let account = demo_account();

        assert!(matches!(
            account.verify(&Credentials::new("demo@scenesplit.com", "wrong")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            account.verify(&Credentials::new("other@scenesplit.com", "let-me-in")),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        let account = StaticCredentials::new(
            "demo@scenesplit.com",
            "not-a-digest",
            User::registered("Demo User", "ADMIN", "demo@scenesplit.com"),
        );

        assert!(account
            .verify(&Credentials::new("demo@scenesplit.com", "not-a-digest"))
            .is_err());
        assert!(account
            .verify(&Credentials::new("demo@scenesplit.com", ""))
            .is_err());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("a@b.c", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
