//! App Configuration
//!
//! Compile-time defaults for the deployed portal. The browser has no
//! environment, so values are baked in here and overridable at
//! construction; provider credentials are public web-app keys (security
//! lives in Firestore rules).

/// Frontend configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Hosted payment link for the founder deposit; opened in a new
    /// browsing context, redirects back to `#/success?session_id=cs_…`
    pub payment_link: String,

    /// Firebase web API key
    pub firebase_api_key: String,

    /// Firebase project identifier
    pub firebase_project_id: String,

    /// Cohort label shown across the portal
    pub cohort_label: String,

    /// Seats available in the cohort
    pub seat_cap: u32,

    /// Deposit amount shown on the success page
    pub deposit_display: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // Replace with your live payment link before deploying.
            payment_link: "https://buy.stripe.com/test_yourpaymentlink".into(),
            firebase_api_key: "your-web-api-key".into(),
            firebase_project_id: "leadsig-crm".into(),
            cohort_label: "Cohort 001".into(),
            seat_cap: 100,
            deposit_display: "$99.99".into(),
        }
    }
}
