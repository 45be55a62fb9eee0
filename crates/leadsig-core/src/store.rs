//! Profile Storage
//!
//! Traits the document-store providers implement, plus an in-memory
//! implementation for development and tests. All operations are async and
//! `?Send` so implementations can run on the browser event loop.

use std::collections::{HashMap, HashSet};
use std::pin::Pin;
use std::sync::RwLock;
use std::task::{Context, Poll};

use async_trait::async_trait;
use chrono::Utc;
use futures::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::error::{PortalError, Result};
use crate::profile::{Profile, UserId};

/// Query over the cohort listing
///
/// The listing is always founders only, ordered by creation timestamp
/// descending; the query caps how many rows are returned.
#[derive(Clone, Copy, Debug)]
pub struct CohortQuery {
    /// Maximum number of profiles per snapshot
    pub limit: usize,
}

impl Default for CohortQuery {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

/// A live, cancellable subscription to cohort snapshots
///
/// Produces a fresh `Vec<Profile>` whenever the underlying store changes.
/// Dropping the subscription unsubscribes.
pub struct CohortSubscription {
    limit: usize,
    inner: WatchStream<Vec<Profile>>,
}

impl CohortSubscription {
    /// Build a subscription from a watch receiver publishing uncapped,
    /// already-ordered snapshots
    pub fn new(receiver: watch::Receiver<Vec<Profile>>, query: CohortQuery) -> Self {
        Self {
            limit: query.limit,
            inner: WatchStream::new(receiver),
        }
    }
}

impl Stream for CohortSubscription {
    type Item = Vec<Profile>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(mut snapshot)) => {
                snapshot.truncate(self.limit);
                Poll::Ready(Some(snapshot))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Document store operations on founder profiles
#[async_trait(?Send)]
pub trait ProfileStore {
    /// Fetch a profile by identity key
    async fn get(&self, uid: &UserId) -> Result<Option<Profile>>;

    /// Create a profile; fails with `AlreadyExists` if one is present
    async fn create(&self, profile: &Profile) -> Result<Profile>;

    /// Create a profile unless one already exists, returning the stored
    /// profile either way
    ///
    /// This is the atomic create-if-absent primitive federated sign-in
    /// relies on: two concurrent first-time sign-ins for the same identity
    /// converge on a single document.
    async fn create_if_absent(&self, profile: &Profile) -> Result<Profile>;

    /// Attach a checkout session reference, first-write-wins
    ///
    /// Returns the stored profile; if a reference was already present the
    /// write is skipped and the existing profile comes back unchanged.
    async fn attach_checkout_session(&self, uid: &UserId, session_id: &str) -> Result<Profile>;

    /// Mark the deposit as paid (monotonic)
    async fn verify_deposit(&self, uid: &UserId) -> Result<Profile>;

    /// Start (or restart) the trial, stamping the start timestamp
    async fn start_trial(&self, uid: &UserId) -> Result<Profile>;

    /// Stop an active trial
    async fn stop_trial(&self, uid: &UserId) -> Result<Profile>;

    /// Grant launch access (monotonic)
    async fn enable_launch_access(&self, uid: &UserId) -> Result<Profile>;

    /// Subscribe to live cohort snapshots
    async fn subscribe_cohort(&self, query: CohortQuery) -> Result<CohortSubscription>;
}

/// Admin capability check
///
/// Membership is a bare existence check on a separate collection keyed by
/// identity key; there are no roles or levels. Implementations degrade to
/// `false` on lookup failure rather than surfacing an error.
#[async_trait(?Send)]
pub trait AdminRegistry {
    async fn is_admin(&self, uid: &UserId) -> bool;
}

/// In-memory profile store (for development/testing)
pub struct MemoryStore {
    profiles: RwLock<HashMap<UserId, Profile>>,
    admins: RwLock<HashSet<UserId>>,
    cohort_tx: watch::Sender<Vec<Profile>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (cohort_tx, _) = watch::channel(Vec::new());
        Self {
            profiles: RwLock::new(HashMap::new()),
            admins: RwLock::new(HashSet::new()),
            cohort_tx,
        }
    }

    /// Grant admin capability to an identity
    pub fn grant_admin(&self, uid: UserId) {
        self.admins.write().unwrap().insert(uid);
    }

    /// Publish a fresh cohort snapshot to all subscribers
    fn publish(&self) {
        let profiles = self.profiles.read().unwrap();
        let mut snapshot: Vec<Profile> = profiles.values().filter(|p| p.founder).cloned().collect();
        snapshot.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        // send_replace so publishing works with zero subscribers
        self.cohort_tx.send_replace(snapshot);
    }

    /// Apply a mutation to a stored profile and publish the result
    fn update_profile<F>(&self, uid: &UserId, mutate: F) -> Result<Profile>
    where
        F: FnOnce(&mut Profile) -> Result<()>,
    {
        let updated = {
            let mut profiles = self.profiles.write().unwrap();
            let profile = profiles
                .get_mut(uid)
                .ok_or_else(|| PortalError::NotFound(format!("profile {uid}")))?;
            mutate(profile)?;
            profile.clone()
        };
        self.publish();
        Ok(updated)
    }
}

#[async_trait(?Send)]
impl ProfileStore for MemoryStore {
    async fn get(&self, uid: &UserId) -> Result<Option<Profile>> {
        let profiles = self.profiles.read().unwrap();
        Ok(profiles.get(uid).cloned())
    }

    async fn create(&self, profile: &Profile) -> Result<Profile> {
        let stored = {
            let mut profiles = self.profiles.write().unwrap();
            if profiles.contains_key(&profile.uid) {
                return Err(PortalError::AlreadyExists(format!(
                    "profile {}",
                    profile.uid
                )));
            }
            let mut stored = profile.clone();
            stored.created_at = Some(Utc::now());
            profiles.insert(stored.uid.clone(), stored.clone());
            stored
        };
        self.publish();
        Ok(stored)
    }

    async fn create_if_absent(&self, profile: &Profile) -> Result<Profile> {
        let (stored, created) = {
            let mut profiles = self.profiles.write().unwrap();
            if let Some(existing) = profiles.get(&profile.uid) {
                (existing.clone(), false)
            } else {
                let mut stored = profile.clone();
                stored.created_at = Some(Utc::now());
                profiles.insert(stored.uid.clone(), stored.clone());
                (stored, true)
            }
        };
        if created {
            self.publish();
        }
        Ok(stored)
    }

    async fn attach_checkout_session(&self, uid: &UserId, session_id: &str) -> Result<Profile> {
        self.update_profile(uid, |p| {
            p.attach_checkout_session(session_id);
            Ok(())
        })
    }

    async fn verify_deposit(&self, uid: &UserId) -> Result<Profile> {
        self.update_profile(uid, |p| {
            p.verify_deposit();
            Ok(())
        })
    }

    async fn start_trial(&self, uid: &UserId) -> Result<Profile> {
        self.update_profile(uid, |p| p.start_trial(Utc::now()))
    }

    async fn stop_trial(&self, uid: &UserId) -> Result<Profile> {
        self.update_profile(uid, Profile::stop_trial)
    }

    async fn enable_launch_access(&self, uid: &UserId) -> Result<Profile> {
        self.update_profile(uid, |p| {
            p.enable_launch_access();
            Ok(())
        })
    }

    async fn subscribe_cohort(&self, query: CohortQuery) -> Result<CohortSubscription> {
        Ok(CohortSubscription::new(self.cohort_tx.subscribe(), query))
    }
}

#[async_trait(?Send)]
impl AdminRegistry for MemoryStore {
    async fn is_admin(&self, uid: &UserId) -> bool {
        self.admins.read().unwrap().contains(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn profile(uid: &str, email: &str) -> Profile {
        Profile::new(UserId::new(uid), email, None)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        let created = store.create(&profile("u1", "a@example.com")).await.unwrap();
        assert!(created.created_at.is_some());

        let loaded = store.get(&UserId::new("u1")).await.unwrap();
        assert_eq!(loaded.unwrap().email, "a@example.com");
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        let store = MemoryStore::new();
        store.create(&profile("u1", "a@example.com")).await.unwrap();

        let err = store
            .create(&profile("u1", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_create_if_absent_keeps_existing() {
        let store = MemoryStore::new();
        let mut first = profile("u1", "a@example.com");
        first.display_name = Some("First".into());
        store.create(&first).await.unwrap();

        let mut second = profile("u1", "a@example.com");
        second.display_name = Some("Second".into());
        let stored = store.create_if_absent(&second).await.unwrap();

        // The existing document is not clobbered.
        assert_eq!(stored.display_name.as_deref(), Some("First"));
    }

    #[tokio::test]
    async fn test_attach_session_first_write_wins() {
        let store = MemoryStore::new();
        let uid = UserId::new("u1");
        store.create(&profile("u1", "a@example.com")).await.unwrap();

        let p = store.attach_checkout_session(&uid, "cs_1").await.unwrap();
        assert_eq!(p.checkout_session_id.as_deref(), Some("cs_1"));

        let p = store.attach_checkout_session(&uid, "cs_2").await.unwrap();
        assert_eq!(p.checkout_session_id.as_deref(), Some("cs_1"));
    }

    #[tokio::test]
    async fn test_update_missing_profile() {
        let store = MemoryStore::new();
        let err = store
            .verify_deposit(&UserId::new("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_subscription_sees_writes() {
        let store = MemoryStore::new();
        let uid = UserId::new("u1");
        store.create(&profile("u1", "a@example.com")).await.unwrap();

        let mut sub = store.subscribe_cohort(CohortQuery::default()).await.unwrap();
        // Initial snapshot reflects current state.
        let snapshot = sub.next().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot[0].deposit_paid);

        store.attach_checkout_session(&uid, "cs_1").await.unwrap();
        store.verify_deposit(&uid).await.unwrap();

        // The write shows up in a later snapshot without a manual refresh.
        let snapshot = sub.next().await.unwrap();
        assert!(snapshot[0].deposit_paid);
    }

    #[tokio::test]
    async fn test_subscription_limit_and_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .create(&profile(&format!("u{i}"), &format!("u{i}@example.com")))
                .await
                .unwrap();
        }

        let mut sub = store
            .subscribe_cohort(CohortQuery { limit: 3 })
            .await
            .unwrap();
        let snapshot = sub.next().await.unwrap();
        assert_eq!(snapshot.len(), 3);

        // Newest first.
        for pair in snapshot.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_non_founders_excluded() {
        let store = MemoryStore::new();
        let mut outsider = profile("u1", "a@example.com");
        outsider.founder = false;
        store.create(&outsider).await.unwrap();

        let mut sub = store.subscribe_cohort(CohortQuery::default()).await.unwrap();
        assert!(sub.next().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_registry() {
        let store = MemoryStore::new();
        let uid = UserId::new("u1");
        assert!(!store.is_admin(&uid).await);

        store.grant_admin(uid.clone());
        assert!(store.is_admin(&uid).await);
    }
}
