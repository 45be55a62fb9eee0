//! Payment Success Page
//!
//! Landing target of the hosted checkout redirect. Validates the
//! `session_id` fragment parameter, waits for a signed-in identity, then
//! attaches the reference to the profile exactly once per visit.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use leadsig_core::{LinkOutcome, PaymentLinker, is_valid_session_id};

use crate::app::AppView;
use crate::components::AuthForm;
use crate::config::AppConfig;
use crate::router::HashRouter;
use crate::session::SessionContext;

#[derive(Clone, Debug, PartialEq, Eq)]
enum LinkState {
    Pending,
    Linked,
    AlreadyLinked,
    Failed(String),
}

#[component]
pub fn SuccessPage() -> impl IntoView {
    let session = SessionContext::expect();
    let router = expect_context::<HashRouter>();
    let view = expect_context::<RwSignal<AppView>>();
    let config = expect_context::<AppConfig>();

    // The candidate is captured once; the fragment doesn't change while the
    // success view is showing.
    let candidate = router.route().get_untracked().session_id().map(str::to_string);
    let valid = candidate.as_deref().is_some_and(is_valid_session_id);

    let state = RwSignal::new(LinkState::Pending);
    let linker: StoredValue<Rc<RefCell<PaymentLinker>>, LocalStorage> =
        StoredValue::new_local(Rc::new(RefCell::new(PaymentLinker::new())));
    let in_flight = RwSignal::new(false);

    // Attach as soon as an identity is available. The linker's own guard
    // makes re-runs (sign-out and back in, stray effect reruns) no-ops.
    let user = session.user();
    let effect_candidate = candidate.clone();
    Effect::new(move |_| {
        let Some(auth_user) = user.get() else {
            return;
        };
        if !valid || in_flight.get_untracked() {
            return;
        }
        in_flight.set(true);

        let store = session.store();
        let cell = linker.get_value();
        let candidate = effect_candidate.clone();
        spawn_local(async move {
            let outcome = cell
                .borrow_mut()
                .link(store.as_ref(), Some(&auth_user.uid), candidate.as_deref())
                .await;
            match outcome {
                Ok(LinkOutcome::Linked) => {
                    state.set(LinkState::Linked);
                    session.refresh_profile();
                }
                Ok(LinkOutcome::AlreadyLinked) => {
                    state.set(LinkState::AlreadyLinked);
                }
                // This identity already attempted during this visit; the
                // earlier attempt set the displayed state.
                Ok(LinkOutcome::AlreadyAttempted) => {}
                // Both are screened off before the spawn: the effect only
                // runs with a signed-in user and a validated candidate.
                Ok(LinkOutcome::NotSignedIn | LinkOutcome::Invalid(_)) => {}
                Err(err) => state.set(LinkState::Failed(err.user_message())),
            }
            in_flight.set(false);
        });
    });

    let go_home = move |_| {
        router.clear();
        view.set(AppView::Landing);
    };

    let received = candidate.clone().unwrap_or_else(|| "(none)".to_string());
    let shown_id = candidate.unwrap_or_default();
    let deposit = config.deposit_display.clone();

    view! {
        <div class="success">
            {if valid {
                view! {
                    <section class="success-panel">
                        <h1>"Deposit Received"</h1>
                        <p>
                            "Your " {deposit.clone()}
                            " founder deposit is confirmed. Your seat in "
                            {config.cohort_label.clone()} " is being held."
                        </p>
                        <p class="success-ref">"Reference: " <code>{shown_id}</code></p>

                        <Show
                            when=move || user.get().is_some()
                            fallback=|| {
                                view! {
                                    <div class="success-signin">
                                        <p>
                                            "Sign in (or create your account) to tie this payment to your founder profile."
                                        </p>
                                        <AuthForm />
                                    </div>
                                }
                            }
                        >
                            {move || match state.get() {
                                LinkState::Pending => {
                                    view! { <p class="link-status">"Linking payment to your account…"</p> }
                                        .into_any()
                                }
                                LinkState::Linked => {
                                    view! {
                                        <p class="link-status link-ok">
                                            "Payment linked to your account. We'll verify the deposit and reach out with implementation next steps."
                                        </p>
                                    }
                                        .into_any()
                                }
                                LinkState::AlreadyLinked => {
                                    view! {
                                        <p class="link-status link-ok">
                                            "This account already has a payment on file; nothing more to do."
                                        </p>
                                    }
                                        .into_any()
                                }
                                LinkState::Failed(message) => {
                                    view! {
                                        <p class="link-status link-error">
                                            "We couldn't link the payment: " {message}
                                            ". Contact support with your reference above."
                                        </p>
                                    }
                                        .into_any()
                                }
                            }}
                        </Show>
                    </section>
                }
                    .into_any()
            } else {
                view! {
                    <section class="success-panel success-invalid">
                        <h1>"Session Not Found"</h1>
                        <p>"The payment reference in the URL is missing or malformed."</p>
                        <p class="success-ref">"Received: " <code>{received.clone()}</code></p>
                        <p class="success-hint">"Expected format: cs_live_... or cs_test_..."</p>
                    </section>
                }
                    .into_any()
            }}

            <button class="btn btn-secondary" on:click=go_home>
                "Back to Landing Page"
            </button>
        </div>
    }
}
