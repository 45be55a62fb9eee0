//! Founder Profile Model
//!
//! One `Profile` document exists per registered identity, keyed by the
//! auth-service uid. Profiles are created at sign-up, mutated by the owning
//! identity (payment session linking) or by an administrator (deposit
//! verification, trial toggles), and never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PortalError, Result};

/// Cohort label stamped on every new profile
pub const DEFAULT_COHORT: &str = "founders_100";

/// Opaque, stable identity key assigned by the auth service
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trial lifecycle state
///
/// Transitions: pending→active (start), active→cancelled (stop),
/// cancelled→active (restart). `Completed` is terminal and is only ever set
/// outside this system; nothing in the portal transitions into it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl TrialStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from the stored string form; unknown values fall back to pending
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The persisted record of one registered identity's cohort/billing/trial
/// state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    /// Identity key (auth-service assigned)
    pub uid: UserId,

    /// Account email
    pub email: String,

    /// Display name shown in the admin table
    pub display_name: Option<String>,

    /// Creation timestamp (stamped by the store; absent until the write lands)
    pub created_at: Option<DateTime<Utc>>,

    /// Cohort membership flag
    pub founder: bool,

    /// Cohort label (e.g., "founders_100")
    pub cohort: Option<String>,

    /// Whether the up-front deposit has been confirmed
    pub deposit_paid: bool,

    /// Checkout session reference from the payment redirect (`cs_…`)
    pub checkout_session_id: Option<String>,

    /// Trial lifecycle state
    pub trial_status: TrialStatus,

    /// When the trial was started
    pub trial_started_at: Option<DateTime<Utc>>,

    /// Whether launch access has been granted
    pub launch_access: bool,
}

impl Profile {
    /// Create a new profile with sign-up defaults
    pub fn new(uid: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            uid,
            email: email.into(),
            display_name,
            created_at: None,
            founder: true,
            cohort: Some(DEFAULT_COHORT.into()),
            deposit_paid: false,
            checkout_session_id: None,
            trial_status: TrialStatus::Pending,
            trial_started_at: None,
            launch_access: false,
        }
    }

    /// Whether the "Verify Deposit" action is enabled for this profile
    ///
    /// Only meaningful while the deposit is unpaid and a checkout session
    /// reference has been linked.
    pub fn can_verify_deposit(&self) -> bool {
        !self.deposit_paid && self.checkout_session_id.is_some()
    }

    /// Whether the trial toggle is enabled for this profile
    pub fn can_toggle_trial(&self) -> bool {
        self.deposit_paid && self.trial_status != TrialStatus::Completed
    }

    /// Confirm the deposit. Monotonic: once true, never reset.
    pub fn verify_deposit(&mut self) {
        self.deposit_paid = true;
    }

    /// Attach a checkout session reference, first-write-wins.
    ///
    /// Returns `true` if the reference was stored, `false` if one was
    /// already present (the existing value is kept).
    pub fn attach_checkout_session(&mut self, session_id: impl Into<String>) -> bool {
        if self.checkout_session_id.is_some() {
            return false;
        }
        self.checkout_session_id = Some(session_id.into());
        true
    }

    /// Start (or restart) the trial, stamping the start timestamp
    pub fn start_trial(&mut self, now: DateTime<Utc>) -> Result<()> {
        match self.trial_status {
            TrialStatus::Active => Err(PortalError::Validation("Trial is already active.".into())),
            TrialStatus::Completed => {
                Err(PortalError::Validation("Trial has already completed.".into()))
            }
            TrialStatus::Pending | TrialStatus::Cancelled => {
                if !self.deposit_paid {
                    return Err(PortalError::Validation(
                        "Deposit must be verified before starting a trial.".into(),
                    ));
                }
                self.trial_status = TrialStatus::Active;
                self.trial_started_at = Some(now);
                Ok(())
            }
        }
    }

    /// Stop an active trial
    pub fn stop_trial(&mut self) -> Result<()> {
        if self.trial_status != TrialStatus::Active {
            return Err(PortalError::Validation("Trial is not active.".into()));
        }
        self.trial_status = TrialStatus::Cancelled;
        Ok(())
    }

    /// Grant launch access. Monotonic: once true, never reset.
    pub fn enable_launch_access(&mut self) {
        self.launch_access = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile::new(
            UserId::new("uid_1"),
            "joe@hardscapes.com",
            Some("Joe Foreman".into()),
        )
    }

    #[test]
    fn test_signup_defaults() {
        let p = profile();
        assert!(p.founder);
        assert_eq!(p.cohort.as_deref(), Some(DEFAULT_COHORT));
        assert!(!p.deposit_paid);
        assert!(p.checkout_session_id.is_none());
        assert_eq!(p.trial_status, TrialStatus::Pending);
        assert!(p.trial_started_at.is_none());
        assert!(!p.launch_access);
    }

    #[test]
    fn test_deposit_is_monotonic() {
        let mut p = profile();
        p.verify_deposit();
        assert!(p.deposit_paid);
        // No API exists to reset it; verifying again stays paid.
        p.verify_deposit();
        assert!(p.deposit_paid);
    }

    #[test]
    fn test_checkout_session_first_write_wins() {
        let mut p = profile();
        assert!(p.attach_checkout_session("cs_test_1"));
        assert!(!p.attach_checkout_session("cs_test_2"));
        assert_eq!(p.checkout_session_id.as_deref(), Some("cs_test_1"));
    }

    #[test]
    fn test_trial_requires_deposit() {
        let mut p = profile();
        assert!(p.start_trial(Utc::now()).is_err());
        assert_eq!(p.trial_status, TrialStatus::Pending);
    }

    #[test]
    fn test_trial_state_machine() {
        let mut p = profile();
        p.verify_deposit();

        p.start_trial(Utc::now()).unwrap();
        assert_eq!(p.trial_status, TrialStatus::Active);
        assert!(p.trial_started_at.is_some());

        // Double-start is rejected
        assert!(p.start_trial(Utc::now()).is_err());

        p.stop_trial().unwrap();
        assert_eq!(p.trial_status, TrialStatus::Cancelled);

        // Stop requires an active trial
        assert!(p.stop_trial().is_err());

        // Restart from cancelled is allowed
        p.start_trial(Utc::now()).unwrap();
        assert_eq!(p.trial_status, TrialStatus::Active);
    }

    #[test]
    fn test_completed_trial_is_terminal() {
        let mut p = profile();
        p.verify_deposit();
        p.trial_status = TrialStatus::Completed;

        assert!(!p.can_toggle_trial());
        assert!(p.start_trial(Utc::now()).is_err());
        assert!(p.stop_trial().is_err());
    }

    #[test]
    fn test_verify_deposit_enablement() {
        let mut p = profile();
        // No session reference yet: not verifiable
        assert!(!p.can_verify_deposit());

        p.attach_checkout_session("cs_test_1");
        assert!(p.can_verify_deposit());

        p.verify_deposit();
        assert!(!p.can_verify_deposit());
    }

    #[test]
    fn test_trial_status_parse_roundtrip() {
        for status in [
            TrialStatus::Pending,
            TrialStatus::Active,
            TrialStatus::Completed,
            TrialStatus::Cancelled,
        ] {
            assert_eq!(TrialStatus::parse(status.as_str()), status);
        }
        // Unknown falls back to pending
        assert_eq!(TrialStatus::parse("paused"), TrialStatus::Pending);
    }
}
