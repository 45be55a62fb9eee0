//! Cloud Firestore Provider
//!
//! Implementation of `ProfileStore` and `AdminRegistry` over the Firestore
//! REST API. Documents live in two collections:
//!
//! - `users/{uid}` — one profile per identity (wire field names match the
//!   deployed Firestore schema: `founderStatus`, `depositPaid`, …)
//! - `admins/{uid}` — admin markers; document existence alone grants the
//!   capability
//!
//! Cohort snapshots are served through the core subscription stream. REST
//! has no push channel, so the client republishes after every mutation it
//! performs and on explicit [`FirestoreClient::refresh_cohort`] calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::sync::watch;

use leadsig_core::{
    AdminRegistry, CohortQuery, CohortSubscription, PortalError, Profile, ProfileStore, Result,
    TrialStatus, UserId,
};

use crate::{FirebaseConfig, TokenCell};

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// Firestore REST client
pub struct FirestoreClient {
    http: reqwest::Client,
    config: FirebaseConfig,
    token: TokenCell,
    cohort_tx: watch::Sender<Vec<Profile>>,
}

impl FirestoreClient {
    /// Create a client sharing `token` with the auth client
    pub fn new(config: FirebaseConfig, token: TokenCell) -> Self {
        let (cohort_tx, _) = watch::channel(Vec::new());
        Self {
            http: reqwest::Client::new(),
            config,
            token,
            cohort_tx,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{FIRESTORE_URL}/projects/{}/databases/(default)/documents",
            self.config.project_id
        )
    }

    fn user_url(&self, uid: &UserId) -> String {
        format!("{}/users/{}", self.documents_url(), uid)
    }

    /// Attach the bearer token when an identity is signed in
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch the raw document for a profile, `None` on 404
    async fn fetch_document(&self, uid: &UserId) -> Result<Option<Value>> {
        let response = self
            .authorized(self.http.get(self.user_url(uid)))
            .send()
            .await
            .map_err(|e| PortalError::Other(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(PortalError::Other(format!(
                "firestore get failed: {}",
                response.status()
            )));
        }

        let doc: Value = response
            .json()
            .await
            .map_err(|e| PortalError::Other(e.to_string()))?;
        Ok(Some(doc))
    }

    /// PATCH named fields on a profile document and decode the result
    async fn patch_fields(&self, uid: &UserId, fields: Value) -> Result<Profile> {
        let field_paths: Vec<(&str, String)> = fields
            .as_object()
            .map(|map| {
                map.keys()
                    .map(|k| ("updateMask.fieldPaths", k.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let response = self
            .authorized(self.http.patch(self.user_url(uid)).query(&field_paths))
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| PortalError::WriteFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortalError::WriteFailure(format!(
                "firestore patch failed: {}",
                response.status()
            )));
        }

        let doc: Value = response
            .json()
            .await
            .map_err(|e| PortalError::WriteFailure(e.to_string()))?;
        let profile = doc_to_profile(&doc)?;

        self.republish().await;
        Ok(profile)
    }

    /// Re-run the cohort query and publish a snapshot to subscribers
    pub async fn refresh_cohort(&self) -> Result<()> {
        let snapshot = self.run_cohort_query().await?;
        tracing::debug!(profiles = snapshot.len(), "cohort snapshot published");
        self.cohort_tx.send_replace(snapshot);
        Ok(())
    }

    /// Best-effort republish after a mutation; failures only log
    async fn republish(&self) {
        if let Err(err) = self.refresh_cohort().await {
            tracing::warn!(error = %err, "cohort snapshot refresh failed");
        }
    }

    async fn run_cohort_query(&self) -> Result<Vec<Profile>> {
        let url = format!("{}:runQuery", self.documents_url());
        let response = self
            .authorized(self.http.post(url))
            .json(&cohort_query_body(100))
            .send()
            .await
            .map_err(|e| PortalError::Other(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortalError::Other(format!(
                "firestore query failed: {}",
                response.status()
            )));
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| PortalError::Other(e.to_string()))?;

        let mut profiles = Vec::new();
        for row in &rows {
            // Rows without a document carry only a readTime.
            if row.get("document").is_some() {
                profiles.push(doc_to_profile(&row["document"])?);
            }
        }
        Ok(profiles)
    }
}

#[async_trait(?Send)]
impl ProfileStore for FirestoreClient {
    async fn get(&self, uid: &UserId) -> Result<Option<Profile>> {
        match self.fetch_document(uid).await? {
            Some(doc) => Ok(Some(doc_to_profile(&doc)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, profile: &Profile) -> Result<Profile> {
        let mut stored = profile.clone();
        // REST creates can't use server timestamps without a commit
        // transform; the client clock stamps creation instead.
        stored.created_at = Some(Utc::now());

        let url = format!("{}/users", self.documents_url());
        let response = self
            .authorized(
                self.http
                    .post(url)
                    .query(&[("documentId", stored.uid.as_str())]),
            )
            .json(&json!({ "fields": profile_to_fields(&stored) }))
            .send()
            .await
            .map_err(|e| PortalError::WriteFailure(e.to_string()))?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(PortalError::AlreadyExists(format!(
                "profile {}",
                stored.uid
            )));
        }
        if !response.status().is_success() {
            return Err(PortalError::WriteFailure(format!(
                "firestore create failed: {}",
                response.status()
            )));
        }

        let doc: Value = response
            .json()
            .await
            .map_err(|e| PortalError::WriteFailure(e.to_string()))?;
        let created = doc_to_profile(&doc)?;
        tracing::debug!(uid = %created.uid, "profile document created");

        self.republish().await;
        Ok(created)
    }

    async fn create_if_absent(&self, profile: &Profile) -> Result<Profile> {
        // `documentId` creates are atomic server-side: the second concurrent
        // create gets a 409 and reads the winner's document back.
        match self.create(profile).await {
            Ok(created) => Ok(created),
            Err(PortalError::AlreadyExists(_)) => self
                .get(&profile.uid)
                .await?
                .ok_or_else(|| PortalError::NotFound(format!("profile {}", profile.uid))),
            Err(err) => Err(err),
        }
    }

    async fn attach_checkout_session(&self, uid: &UserId, session_id: &str) -> Result<Profile> {
        // First-write-wins: read-check, then write. The check-then-write is
        // not atomic at the document level; a concurrent self-link from
        // another tab writes identical data, so the race is benign.
        let existing = self
            .get(uid)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("profile {uid}")))?;
        if existing.checkout_session_id.is_some() {
            return Ok(existing);
        }

        self.patch_fields(uid, json!({ "stripeSessionId": { "stringValue": session_id } }))
            .await
    }

    async fn verify_deposit(&self, uid: &UserId) -> Result<Profile> {
        self.patch_fields(uid, json!({ "depositPaid": { "booleanValue": true } }))
            .await
    }

    async fn start_trial(&self, uid: &UserId) -> Result<Profile> {
        let mut profile = self
            .get(uid)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("profile {uid}")))?;
        let now = Utc::now();
        profile.start_trial(now)?;

        self.patch_fields(
            uid,
            json!({
                "trialStatus": { "stringValue": TrialStatus::Active.as_str() },
                "trialStartDate": { "timestampValue": now.to_rfc3339() },
            }),
        )
        .await
    }

    async fn stop_trial(&self, uid: &UserId) -> Result<Profile> {
        let mut profile = self
            .get(uid)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("profile {uid}")))?;
        profile.stop_trial()?;

        self.patch_fields(
            uid,
            json!({ "trialStatus": { "stringValue": TrialStatus::Cancelled.as_str() } }),
        )
        .await
    }

    async fn enable_launch_access(&self, uid: &UserId) -> Result<Profile> {
        self.patch_fields(uid, json!({ "launchAccessEnabled": { "booleanValue": true } }))
            .await
    }

    async fn subscribe_cohort(&self, query: CohortQuery) -> Result<CohortSubscription> {
        // Prime the channel so the first snapshot is current, not the empty
        // initial value.
        self.refresh_cohort().await?;
        Ok(CohortSubscription::new(self.cohort_tx.subscribe(), query))
    }
}

#[async_trait(?Send)]
impl AdminRegistry for FirestoreClient {
    async fn is_admin(&self, uid: &UserId) -> bool {
        let url = format!("{}/admins/{}", self.documents_url(), uid);
        let response = self.authorized(self.http.get(url)).send().await;

        match response {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                if response.status() != reqwest::StatusCode::NOT_FOUND {
                    tracing::warn!(status = %response.status(), "admin check degraded to non-admin");
                }
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "admin check degraded to non-admin");
                false
            }
        }
    }
}

/// The structured query behind the cohort listing: founders only, newest
/// first, capped
fn cohort_query_body(limit: i64) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": "users" }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "founderStatus" },
                    "op": "EQUAL",
                    "value": { "booleanValue": true },
                }
            },
            "orderBy": [{
                "field": { "fieldPath": "createdAt" },
                "direction": "DESCENDING",
            }],
            "limit": limit,
        }
    })
}

/// Encode a profile into Firestore typed fields
fn profile_to_fields(profile: &Profile) -> Value {
    json!({
        "email": { "stringValue": profile.email },
        "displayName": opt_string(profile.display_name.as_deref()),
        "createdAt": opt_timestamp(profile.created_at),
        "founderStatus": { "booleanValue": profile.founder },
        "founderCohort": opt_string(profile.cohort.as_deref()),
        "depositPaid": { "booleanValue": profile.deposit_paid },
        "stripeSessionId": opt_string(profile.checkout_session_id.as_deref()),
        "trialStatus": { "stringValue": profile.trial_status.as_str() },
        "trialStartDate": opt_timestamp(profile.trial_started_at),
        "launchAccessEnabled": { "booleanValue": profile.launch_access },
    })
}

/// Decode a Firestore document into a profile
///
/// Missing or null fields take the profile defaults, matching how the
/// deployed schema treats absent attributes.
fn doc_to_profile(doc: &Value) -> Result<Profile> {
    let name = doc["name"]
        .as_str()
        .ok_or_else(|| PortalError::Other("document missing name".into()))?;
    let uid = name
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PortalError::Other(format!("malformed document name: {name}")))?;

    let fields = &doc["fields"];
    Ok(Profile {
        uid: UserId::new(uid),
        email: string_field(fields, "email").unwrap_or_default(),
        display_name: string_field(fields, "displayName"),
        created_at: timestamp_field(fields, "createdAt"),
        founder: bool_field(fields, "founderStatus"),
        cohort: string_field(fields, "founderCohort"),
        deposit_paid: bool_field(fields, "depositPaid"),
        checkout_session_id: string_field(fields, "stripeSessionId"),
        trial_status: string_field(fields, "trialStatus")
            .map(|s| TrialStatus::parse(&s))
            .unwrap_or_default(),
        trial_started_at: timestamp_field(fields, "trialStartDate"),
        launch_access: bool_field(fields, "launchAccessEnabled"),
    })
}

fn opt_string(value: Option<&str>) -> Value {
    match value {
        Some(s) => json!({ "stringValue": s }),
        None => json!({ "nullValue": null }),
    }
}

fn opt_timestamp(value: Option<DateTime<Utc>>) -> Value {
    match value {
        Some(ts) => json!({ "timestampValue": ts.to_rfc3339() }),
        None => json!({ "nullValue": null }),
    }
}

fn string_field(fields: &Value, name: &str) -> Option<String> {
    fields[name]["stringValue"].as_str().map(str::to_string)
}

fn bool_field(fields: &Value, name: &str) -> bool {
    fields[name]["booleanValue"].as_bool().unwrap_or(false)
}

fn timestamp_field(fields: &Value, name: &str) -> Option<DateTime<Utc>> {
    fields[name]["timestampValue"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_profile() -> Profile {
        let mut profile = Profile::new(
            UserId::new("uid_1"),
            "joe@hardscapes.com",
            Some("Joe Foreman".into()),
        );
        profile.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        profile.attach_checkout_session("cs_test_1");
        profile
    }

    #[test]
    fn test_field_encoding() {
        let fields = profile_to_fields(&sample_profile());

        assert_eq!(fields["email"]["stringValue"], "joe@hardscapes.com");
        assert_eq!(fields["founderStatus"]["booleanValue"], true);
        assert_eq!(fields["depositPaid"]["booleanValue"], false);
        assert_eq!(fields["stripeSessionId"]["stringValue"], "cs_test_1");
        assert_eq!(fields["trialStatus"]["stringValue"], "pending");
        assert!(fields["trialStartDate"].get("nullValue").is_some());
    }

    #[test]
    fn test_document_decoding() {
        let profile = sample_profile();
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/users/uid_1",
            "fields": profile_to_fields(&profile),
        });

        let decoded = doc_to_profile(&doc).unwrap();
        assert_eq!(decoded.uid.as_str(), "uid_1");
        assert_eq!(decoded.email, profile.email);
        assert_eq!(decoded.display_name, profile.display_name);
        assert_eq!(decoded.created_at, profile.created_at);
        assert_eq!(decoded.checkout_session_id, profile.checkout_session_id);
        assert_eq!(decoded.trial_status, TrialStatus::Pending);
        assert!(!decoded.launch_access);
    }

    #[test]
    fn test_decoding_defaults_missing_fields() {
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/users/uid_2",
            "fields": {
                "email": { "stringValue": "sparse@example.com" },
            },
        });

        let decoded = doc_to_profile(&doc).unwrap();
        assert_eq!(decoded.uid.as_str(), "uid_2");
        assert!(!decoded.founder);
        assert!(!decoded.deposit_paid);
        assert!(decoded.checkout_session_id.is_none());
        assert_eq!(decoded.trial_status, TrialStatus::Pending);
        assert!(decoded.trial_started_at.is_none());
    }

    #[test]
    fn test_decoding_unknown_trial_status() {
        let doc = json!({
            "name": "x/users/uid_3",
            "fields": { "trialStatus": { "stringValue": "paused" } },
        });

        let decoded = doc_to_profile(&doc).unwrap();
        assert_eq!(decoded.trial_status, TrialStatus::Pending);
    }

    #[test]
    fn test_document_without_name_rejected() {
        let doc = json!({ "fields": {} });
        assert!(doc_to_profile(&doc).is_err());
    }

    #[test]
    fn test_cohort_query_shape() {
        let body = cohort_query_body(100);
        let query = &body["structuredQuery"];

        assert_eq!(query["from"][0]["collectionId"], "users");
        assert_eq!(
            query["where"]["fieldFilter"]["field"]["fieldPath"],
            "founderStatus"
        );
        assert_eq!(query["orderBy"][0]["direction"], "DESCENDING");
        assert_eq!(query["limit"], 100);
    }
}
