//! Post-Payment Linker
//!
//! After the hosted checkout redirects back with `session_id` in the URL
//! fragment, the linker validates the identifier and attaches it to the
//! signed-in identity's profile exactly once.

use std::collections::HashSet;

use crate::error::Result;
use crate::profile::UserId;
use crate::store::ProfileStore;

/// Required prefix for a checkout session identifier
pub const SESSION_ID_PREFIX: &str = "cs_";

/// Whether a candidate payment session identifier is well-formed
pub fn is_valid_session_id(candidate: &str) -> bool {
    candidate.starts_with(SESSION_ID_PREFIX)
}

/// Outcome of a link attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The session reference was stored on the profile
    Linked,

    /// The profile already carried a session reference; nothing was written
    AlreadyLinked,

    /// The identifier was missing or malformed; nothing was written.
    /// Carries the literal received value for display.
    Invalid(Option<String>),

    /// No identity is signed in; nothing was written
    NotSignedIn,

    /// This visit already attempted an attachment for this identity;
    /// nothing was written
    AlreadyAttempted,
}

/// One-shot attachment of a payment session reference to a profile
///
/// The attempted guard is per page visit, per identity: re-renders of the
/// success view reuse the same linker and must not issue redundant writes,
/// but a different identity signing in on the same visit gets its own
/// attempt. Navigating away and back constructs a fresh linker, which
/// re-attempts.
#[derive(Default)]
pub struct PaymentLinker {
    attempted: HashSet<UserId>,
}

impl PaymentLinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the candidate and attach it to the profile
    ///
    /// A failed write surfaces the error and leaves the guard set; there is
    /// no retry policy here.
    pub async fn link(
        &mut self,
        store: &dyn ProfileStore,
        uid: Option<&UserId>,
        candidate: Option<&str>,
    ) -> Result<LinkOutcome> {
        let candidate = match candidate {
            Some(c) if is_valid_session_id(c) => c,
            other => return Ok(LinkOutcome::Invalid(other.map(str::to_string))),
        };

        let Some(uid) = uid else {
            return Ok(LinkOutcome::NotSignedIn);
        };

        if !self.attempted.insert(uid.clone()) {
            return Ok(LinkOutcome::AlreadyAttempted);
        }

        let before = store.get(uid).await?;
        if before.as_ref().is_some_and(|p| p.checkout_session_id.is_some()) {
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let after = store.attach_checkout_session(uid, candidate).await?;
        if after.checkout_session_id.as_deref() == Some(candidate) {
            Ok(LinkOutcome::Linked)
        } else {
            // Another writer got there first; the store kept its value.
            Ok(LinkOutcome::AlreadyLinked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::store::MemoryStore;

    async fn store_with_profile() -> (MemoryStore, UserId) {
        let store = MemoryStore::new();
        let uid = UserId::new("u1");
        store
            .create(&Profile::new(uid.clone(), "a@example.com", None))
            .await
            .unwrap();
        (store, uid)
    }

    #[test]
    fn test_session_id_validity() {
        assert!(is_valid_session_id("cs_test_1"));
        assert!(is_valid_session_id("cs_live_abc"));
        assert!(!is_valid_session_id("bogus"));
        assert!(!is_valid_session_id(""));
        assert!(!is_valid_session_id("CS_test_1"));
    }

    #[tokio::test]
    async fn test_invalid_candidate_writes_nothing() {
        let (store, uid) = store_with_profile().await;
        let mut linker = PaymentLinker::new();

        let outcome = linker
            .link(&store, Some(&uid), Some("bogus"))
            .await
            .unwrap();
        assert_eq!(outcome, LinkOutcome::Invalid(Some("bogus".into())));

        let outcome = linker.link(&store, Some(&uid), None).await.unwrap();
        assert_eq!(outcome, LinkOutcome::Invalid(None));

        let profile = store.get(&uid).await.unwrap().unwrap();
        assert!(profile.checkout_session_id.is_none());
    }

    #[tokio::test]
    async fn test_link_attaches_once_per_visit() {
        let (store, uid) = store_with_profile().await;
        let mut linker = PaymentLinker::new();

        let outcome = linker
            .link(&store, Some(&uid), Some("cs_test_1"))
            .await
            .unwrap();
        assert_eq!(outcome, LinkOutcome::Linked);

        // Re-render: same linker, same candidate. No second write.
        let outcome = linker
            .link(&store, Some(&uid), Some("cs_test_1"))
            .await
            .unwrap();
        assert_eq!(outcome, LinkOutcome::AlreadyAttempted);

        let profile = store.get(&uid).await.unwrap().unwrap();
        assert_eq!(profile.checkout_session_id.as_deref(), Some("cs_test_1"));
    }

    #[tokio::test]
    async fn test_second_identity_gets_own_attempt() {
        let (store, uid_a) = store_with_profile().await;
        let uid_b = UserId::new("u2");
        store
            .create(&Profile::new(uid_b.clone(), "b@example.com", None))
            .await
            .unwrap();

        // Identity A links, signs out; identity B signs in on the same
        // success view. The guard is per identity, so B links too.
        let mut linker = PaymentLinker::new();
        let outcome = linker
            .link(&store, Some(&uid_a), Some("cs_test_1"))
            .await
            .unwrap();
        assert_eq!(outcome, LinkOutcome::Linked);

        let outcome = linker
            .link(&store, Some(&uid_b), Some("cs_test_1"))
            .await
            .unwrap();
        assert_eq!(outcome, LinkOutcome::Linked);

        let profile = store.get(&uid_b).await.unwrap().unwrap();
        assert_eq!(profile.checkout_session_id.as_deref(), Some("cs_test_1"));

        // Each identity is still limited to one attempt.
        let outcome = linker
            .link(&store, Some(&uid_b), Some("cs_test_1"))
            .await
            .unwrap();
        assert_eq!(outcome, LinkOutcome::AlreadyAttempted);
    }

    #[tokio::test]
    async fn test_already_linked_profile_is_not_overwritten() {
        let (store, uid) = store_with_profile().await;
        store
            .attach_checkout_session(&uid, "cs_first")
            .await
            .unwrap();

        let mut linker = PaymentLinker::new();
        let outcome = linker
            .link(&store, Some(&uid), Some("cs_second"))
            .await
            .unwrap();
        assert_eq!(outcome, LinkOutcome::AlreadyLinked);

        let profile = store.get(&uid).await.unwrap().unwrap();
        assert_eq!(profile.checkout_session_id.as_deref(), Some("cs_first"));
    }

    #[tokio::test]
    async fn test_signed_out_visitor() {
        let (store, _uid) = store_with_profile().await;
        let mut linker = PaymentLinker::new();

        let outcome = linker.link(&store, None, Some("cs_test_1")).await.unwrap();
        assert_eq!(outcome, LinkOutcome::NotSignedIn);

        // Signing in afterwards still gets a fresh attempt.
        let uid = UserId::new("u1");
        let outcome = linker
            .link(&store, Some(&uid), Some("cs_test_1"))
            .await
            .unwrap();
        assert_eq!(outcome, LinkOutcome::Linked);
    }
}
