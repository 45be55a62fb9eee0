//! Portal Views

mod admin;
mod guides;
mod landing;
mod success;

pub use admin::AdminPage;
pub use guides::{DeploymentGuidePage, FirebaseGuidePage, StripeGuidePage};
pub use landing::LandingPage;
pub use success::SuccessPage;
