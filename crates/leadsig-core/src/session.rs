//! Session Orchestration
//!
//! `Session` tracks the authenticated identity and its profile document and
//! exposes the identity operations. It is an explicitly constructed
//! dependency object (auth service + profile store handed in at creation,
//! state torn down on sign-out), not an ambient singleton.
//!
//! Every failed operation records a displayable `last_error` and re-throws
//! to the caller; nothing is silently swallowed.

use std::rc::Rc;

use crate::auth::{AuthService, AuthUser};
use crate::error::{PortalError, Result};
use crate::profile::Profile;
use crate::store::ProfileStore;

/// The current identity and profile, with the operations that move them
pub struct Session {
    auth: Rc<dyn AuthService>,
    store: Rc<dyn ProfileStore>,
    user: Option<AuthUser>,
    profile: Option<Profile>,
    last_error: Option<String>,
}

impl Session {
    /// Create a session bound to an auth service and profile store
    pub fn new(auth: Rc<dyn AuthService>, store: Rc<dyn ProfileStore>) -> Self {
        Self {
            auth,
            store,
            user: None,
            profile: None,
            last_error: None,
        }
    }

    /// The signed-in identity, if any
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// The signed-in identity's profile, if loaded
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// The most recent operation failure, as a displayable message
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The profile store this session operates against
    pub fn store(&self) -> Rc<dyn ProfileStore> {
        Rc::clone(&self.store)
    }

    /// Record a failure for display and hand it back to the caller
    fn fail<T>(&mut self, err: PortalError) -> Result<T> {
        self.last_error = Some(err.user_message());
        tracing::warn!(error = %err, "session operation failed");
        Err(err)
    }

    /// Sign in with email and password, then load the profile
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<()> {
        self.last_error = None;
        let user = match self.auth.sign_in(email, password).await {
            Ok(user) => user,
            Err(err) => return self.fail(err),
        };
        self.user = Some(user);
        self.refresh_profile().await
    }

    /// Register a new identity, create its profile, and load it
    ///
    /// The profile-creation write is awaited before the read so the
    /// read-back observes the document.
    pub async fn sign_up(&mut self, email: &str, password: &str, display_name: &str) -> Result<()> {
        self.last_error = None;
        if display_name.trim().is_empty() {
            return self.fail(PortalError::Validation("Display name is required.".into()));
        }

        let user = match self.auth.sign_up(email, password).await {
            Ok(user) => user,
            Err(err) => return self.fail(err),
        };

        let profile = Profile::new(
            user.uid.clone(),
            email,
            Some(display_name.trim().to_string()),
        );
        let stored = match self.store.create(&profile).await {
            Ok(stored) => stored,
            Err(err) => return self.fail(err),
        };

        self.user = Some(user);
        self.profile = Some(stored);
        Ok(())
    }

    /// Federated Google sign-in, creating a default profile on first visit
    ///
    /// Creation goes through the store's create-if-absent primitive, so a
    /// repeat sign-in (or a concurrent one from another tab) never clobbers
    /// an existing profile.
    pub async fn sign_in_with_google(&mut self, id_token: &str) -> Result<()> {
        self.last_error = None;
        let user = match self.auth.sign_in_with_google(id_token).await {
            Ok(user) => user,
            Err(err) => return self.fail(err),
        };

        let default_profile = Profile::new(
            user.uid.clone(),
            user.email.clone(),
            user.display_name.clone(),
        );
        let stored = match self.store.create_if_absent(&default_profile).await {
            Ok(stored) => stored,
            Err(err) => return self.fail(err),
        };

        self.user = Some(user);
        self.profile = Some(stored);
        Ok(())
    }

    /// Sign out and tear down in-memory state
    pub async fn sign_out(&mut self) -> Result<()> {
        if let Err(err) = self.auth.sign_out().await {
            return self.fail(err);
        }
        self.user = None;
        self.profile = None;
        self.last_error = None;
        Ok(())
    }

    /// Re-fetch the profile for the current identity; no-op when signed out
    pub async fn refresh_profile(&mut self) -> Result<()> {
        let Some(user) = self.user.clone() else {
            return Ok(());
        };
        match self.store.get(&user.uid).await {
            Ok(profile) => {
                self.profile = profile;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryAuth;
    use crate::profile::TrialStatus;
    use crate::store::MemoryStore;

    fn session() -> (Session, Rc<MemoryAuth>, Rc<MemoryStore>) {
        let auth = Rc::new(MemoryAuth::new());
        let store = Rc::new(MemoryStore::new());
        let session = Session::new(
            Rc::clone(&auth) as Rc<dyn AuthService>,
            Rc::clone(&store) as Rc<dyn ProfileStore>,
        );
        (session, auth, store)
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile_with_defaults() {
        let (mut session, _auth, _store) = session();
        session
            .sign_up("joe@hardscapes.com", "hunter2", "Joe Foreman")
            .await
            .unwrap();

        let profile = session.profile().unwrap();
        assert_eq!(profile.email, "joe@hardscapes.com");
        assert_eq!(profile.display_name.as_deref(), Some("Joe Foreman"));
        assert!(profile.founder);
        assert!(!profile.deposit_paid);
        assert_eq!(profile.trial_status, TrialStatus::Pending);
    }

    #[tokio::test]
    async fn test_sign_up_requires_display_name() {
        let (mut session, _auth, _store) = session();
        let err = session
            .sign_up("joe@hardscapes.com", "hunter2", "   ")
            .await
            .unwrap_err();

        assert!(matches!(err, PortalError::Validation(_)));
        assert!(session.last_error().is_some());
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_retry_fails_with_already_exists() {
        let (mut session, _auth, _store) = session();
        session
            .sign_up("joe@hardscapes.com", "hunter2", "Joe")
            .await
            .unwrap();
        session.sign_out().await.unwrap();

        let err = session
            .sign_up("joe@hardscapes.com", "hunter2", "Joe")
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_sign_in_loads_profile() {
        let (mut session, _auth, _store) = session();
        session
            .sign_up("joe@hardscapes.com", "hunter2", "Joe")
            .await
            .unwrap();
        session.sign_out().await.unwrap();
        assert!(session.profile().is_none());

        session.sign_in("joe@hardscapes.com", "hunter2").await.unwrap();
        assert!(session.user().is_some());
        assert_eq!(session.profile().unwrap().email, "joe@hardscapes.com");
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials() {
        let (mut session, _auth, _store) = session();
        let err = session
            .sign_in("ghost@example.com", "nope")
            .await
            .unwrap_err();

        assert!(matches!(err, PortalError::InvalidCredentials));
        assert!(session.last_error().is_some());
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_google_first_sign_in_creates_profile() {
        let (mut session, auth, _store) = session();
        auth.register_google("tok_1", "g@example.com");

        session.sign_in_with_google("tok_1").await.unwrap();
        let profile = session.profile().unwrap();
        assert_eq!(profile.email, "g@example.com");
        assert!(profile.founder);
    }

    #[tokio::test]
    async fn test_google_repeat_sign_in_keeps_profile() {
        let (mut session, auth, store) = session();
        let user = auth.register_google("tok_1", "g@example.com");

        session.sign_in_with_google("tok_1").await.unwrap();
        store
            .attach_checkout_session(&user.uid, "cs_test_1")
            .await
            .unwrap();

        session.sign_out().await.unwrap();
        session.sign_in_with_google("tok_1").await.unwrap();

        // Second sign-in does not clobber the linked session reference.
        let profile = session.profile().unwrap();
        assert_eq!(profile.checkout_session_id.as_deref(), Some("cs_test_1"));
    }

    #[tokio::test]
    async fn test_refresh_is_noop_when_signed_out() {
        let (mut session, _auth, _store) = session();
        session.refresh_profile().await.unwrap();
        assert!(session.profile().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_state() {
        let (mut session, _auth, _store) = session();
        session
            .sign_up("joe@hardscapes.com", "hunter2", "Joe")
            .await
            .unwrap();

        session.sign_out().await.unwrap();
        assert!(session.user().is_none());
        assert!(session.profile().is_none());
        assert!(session.last_error().is_none());
    }
}
