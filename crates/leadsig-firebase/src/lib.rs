//! # leadsig-firebase
//!
//! Firebase-backed implementations of the `leadsig-core` traits:
//!
//! - **`FirebaseAuth`**: `AuthService` over the Identity Toolkit REST API
//!   (email/password and Google federated sign-in)
//! - **`FirestoreClient`**: `ProfileStore` + `AdminRegistry` over the Cloud
//!   Firestore REST API
//!
//! Both run on native targets and in the browser (reqwest's fetch backend).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use leadsig_firebase::{FirebaseAuth, FirebaseConfig, FirestoreClient, TokenCell};
//!
//! let config = FirebaseConfig::from_env()?;
//! let token = TokenCell::new();
//! let auth = FirebaseAuth::new(config.clone(), token.clone());
//! let store = FirestoreClient::new(config, token);
//! ```

pub mod auth;
pub mod firestore;

pub use auth::FirebaseAuth;
pub use firestore::FirestoreClient;

use std::cell::RefCell;
use std::rc::Rc;

use leadsig_core::{PortalError, Result};

/// Firebase project configuration
#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    /// Web API key (public; security lives in Firestore rules)
    pub api_key: String,

    /// Firebase project identifier
    pub project_id: String,
}

impl FirebaseConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
        }
    }

    /// Create from environment variables (native tooling only)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FIREBASE_API_KEY")
            .map_err(|_| PortalError::Config("FIREBASE_API_KEY not set".into()))?;
        let project_id = std::env::var("FIREBASE_PROJECT_ID")
            .map_err(|_| PortalError::Config("FIREBASE_PROJECT_ID not set".into()))?;

        Ok(Self::new(api_key, project_id))
    }
}

/// Shared holder for the current Firebase ID token
///
/// `FirebaseAuth` fills it on sign-in and drops it on sign-out;
/// `FirestoreClient` reads it to authorize document requests. The portal is
/// single-threaded (browser event loop), so plain `Rc<RefCell<…>>` suffices.
#[derive(Clone, Default)]
pub struct TokenCell(Rc<RefCell<Option<String>>>);

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.0.borrow_mut() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.0.borrow_mut() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0.borrow().clone()
    }
}
