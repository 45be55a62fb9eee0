//! Auth Service Abstraction
//!
//! Defines the identity operations the session layer needs, independent of
//! the backing auth provider. Production uses the Firebase implementation;
//! development and tests use `MemoryAuth`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PortalError, Result};
use crate::profile::UserId;

/// The authenticated identity as reported by the auth service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable identity key
    pub uid: UserId,

    /// Account email
    pub email: String,

    /// Display name, when the provider supplies one
    pub display_name: Option<String>,
}

/// Identity operations
///
/// All operations are safe to retry except sign-up, which fails with
/// `AlreadyExists` on retry after success.
#[async_trait(?Send)]
pub trait AuthService {
    /// Authenticate with email and password
    ///
    /// Fails with `InvalidCredentials` when the service rejects the pair.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Register a new identity
    ///
    /// Fails with `AlreadyExists` when the email is taken.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Federated sign-in with a Google ID token
    async fn sign_in_with_google(&self, id_token: &str) -> Result<AuthUser>;

    /// Clear any provider-side session state
    async fn sign_out(&self) -> Result<()>;
}

struct MemoryAccount {
    password: String,
    user: AuthUser,
}

/// In-memory auth service (for development/testing)
pub struct MemoryAuth {
    accounts: RwLock<HashMap<String, MemoryAccount>>,
    google_accounts: RwLock<HashMap<String, AuthUser>>,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            google_accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Pre-register a Google identity keyed by the ID token it presents
    pub fn register_google(&self, id_token: impl Into<String>, email: impl Into<String>) -> AuthUser {
        let user = AuthUser {
            uid: UserId::new(Uuid::new_v4().to_string()),
            email: email.into(),
            display_name: None,
        };
        self.google_accounts
            .write()
            .unwrap()
            .insert(id_token.into(), user.clone());
        user
    }
}

#[async_trait(?Send)]
impl AuthService for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let accounts = self.accounts.read().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(account.user.clone()),
            _ => Err(PortalError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(email) {
            return Err(PortalError::AlreadyExists(email.to_string()));
        }

        let user = AuthUser {
            uid: UserId::new(Uuid::new_v4().to_string()),
            email: email.to_string(),
            display_name: None,
        };
        accounts.insert(
            email.to_string(),
            MemoryAccount {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        Ok(user)
    }

    async fn sign_in_with_google(&self, id_token: &str) -> Result<AuthUser> {
        let google = self.google_accounts.read().unwrap();
        google
            .get(id_token)
            .cloned()
            .ok_or_else(|| PortalError::Auth("Unrecognized Google credential".into()))
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = MemoryAuth::new();
        let user = auth.sign_up("a@example.com", "hunter2").await.unwrap();

        let again = auth.sign_in("a@example.com", "hunter2").await.unwrap();
        assert_eq!(user.uid, again.uid);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let auth = MemoryAuth::new();
        auth.sign_up("a@example.com", "hunter2").await.unwrap();

        let err = auth.sign_in("a@example.com", "letmein").await.unwrap_err();
        assert!(matches!(err, PortalError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_rejected() {
        let auth = MemoryAuth::new();
        auth.sign_up("a@example.com", "hunter2").await.unwrap();

        let err = auth.sign_up("a@example.com", "other").await.unwrap_err();
        assert!(matches!(err, PortalError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_google_sign_in() {
        let auth = MemoryAuth::new();
        let registered = auth.register_google("tok_1", "g@example.com");

        let user = auth.sign_in_with_google("tok_1").await.unwrap();
        assert_eq!(user.uid, registered.uid);

        assert!(auth.sign_in_with_google("tok_other").await.is_err());
    }
}
