//! # leadsig-core
//!
//! Core domain logic for the LeadSig founders portal: the cohort profile
//! model, hash-route parsing, session orchestration, and the storage/auth
//! traits the providers implement.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Session                              │
//! │  ┌─────────────┐  ┌──────────────────┐  ┌────────────────┐  │
//! │  │ AuthService │  │   ProfileStore   │  │ PaymentLinker  │  │
//! │  │  (trait)    │──│   (trait)        │──│  (one-shot)    │  │
//! │  └─────────────┘  └──────────────────┘  └────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `AuthService` and `ProfileStore` traits let the portal run against
//! Firebase in production and the in-memory implementations in tests,
//! without changing the session logic.

pub mod auth;
pub mod error;
pub mod linker;
pub mod profile;
pub mod route;
pub mod session;
pub mod store;

pub use auth::{AuthService, AuthUser, MemoryAuth};
pub use error::{PortalError, Result};
pub use linker::{LinkOutcome, PaymentLinker, is_valid_session_id};
pub use profile::{Profile, TrialStatus, UserId};
pub use route::Route;
pub use session::Session;
pub use store::{AdminRegistry, CohortQuery, CohortSubscription, MemoryStore, ProfileStore};
