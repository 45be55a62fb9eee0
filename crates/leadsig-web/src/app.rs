//! App Shell
//!
//! Wires the providers together, installs the session and router contexts,
//! and routes between the portal views.

use std::rc::Rc;

use leptos::prelude::*;

use leadsig_firebase::{FirebaseAuth, FirebaseConfig, FirestoreClient, TokenCell};

use crate::components::{Footer, Header};
use crate::config::AppConfig;
use crate::pages::{
    AdminPage, DeploymentGuidePage, FirebaseGuidePage, LandingPage, StripeGuidePage, SuccessPage,
};
use crate::router::HashRouter;
use crate::session::SessionContext;

/// Which portal view is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AppView {
    Landing,
    StripeGuide,
    FirebaseGuide,
    DeploymentGuide,
    Admin,
    Success,
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::default();
    let firebase = FirebaseConfig::new(
        config.firebase_api_key.clone(),
        config.firebase_project_id.clone(),
    );

    // Auth and Firestore share one token cell; a single Firestore client
    // serves both the profile store and the admin registry.
    let token = TokenCell::new();
    let auth = Rc::new(FirebaseAuth::new(firebase.clone(), token.clone()));
    let firestore = Rc::new(FirestoreClient::new(firebase, token));
    let session = SessionContext::provide(
        auth,
        Rc::clone(&firestore) as Rc<dyn leadsig_core::ProfileStore>,
        firestore,
    );

    let router = HashRouter::new();
    provide_context(router);

    let view = RwSignal::new(AppView::Landing);
    provide_context(view);
    provide_context(config.clone());

    // The hosted checkout redirects back to `#/success?session_id=cs_…`.
    let route = router.route();
    Effect::new(move |_| {
        if route.get().path == "success" {
            view.set(AppView::Success);
        }
    });

    // Credentials from the hosting page's Google sign-in snippet.
    crate::set_google_credential_sink(move |id_token| session.sign_in_with_google(id_token));

    let payment_link = config.payment_link;
    let on_cta = Callback::new(move |()| {
        if let Some(window) = web_sys::window() {
            let _ = window.open_with_url_and_target(&payment_link, "_blank");
        }
    });

    view! {
        <div class="shell">
            <Header />
            <main class="main">
                {move || match view.get() {
                    AppView::Landing => view! { <LandingPage on_cta=on_cta /> }.into_any(),
                    AppView::StripeGuide => view! { <StripeGuidePage /> }.into_any(),
                    AppView::FirebaseGuide => view! { <FirebaseGuidePage /> }.into_any(),
                    AppView::DeploymentGuide => view! { <DeploymentGuidePage /> }.into_any(),
                    AppView::Admin => view! { <AdminPage /> }.into_any(),
                    AppView::Success => view! { <SuccessPage /> }.into_any(),
                }}
            </main>
            <Footer />
        </div>
    }
}
