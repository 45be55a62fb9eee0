//! UI Components

use leptos::prelude::*;

use leadsig_core::TrialStatus;

use crate::app::AppView;
use crate::session::SessionContext;

/// Sticky top navigation between the portal views
#[component]
pub fn Header() -> impl IntoView {
    let view = expect_context::<RwSignal<AppView>>();
    let session = SessionContext::expect();

    let nav_items = [
        ("Landing Page", AppView::Landing),
        ("Stripe Setup", AppView::StripeGuide),
        ("Firebase Setup", AppView::FirebaseGuide),
        ("GCP Deployment", AppView::DeploymentGuide),
        ("Admin Portal", AppView::Admin),
    ];

    view! {
        <header class="header">
            <div class="brand" on:click=move |_| view.set(AppView::Landing)>
                "LEADSIG" <span class="brand-accent">" CRM"</span>
            </div>

            <nav class="nav">
                {nav_items
                    .into_iter()
                    .map(|(label, target)| {
                        view! {
                            <button
                                class="nav-item"
                                class=("nav-item-active", move || view.get() == target)
                                on:click=move |_| view.set(target)
                            >
                                {label}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>

            <Show when=move || session.user().get().is_some()>
                <div class="account">
                    <span class="account-email">
                        {move || {
                            session.user().get().map(|u| u.email).unwrap_or_default()
                        }}
                    </span>
                    <button class="btn btn-ghost" on:click=move |_| session.sign_out()>
                        "Sign Out"
                    </button>
                </div>
            </Show>
        </header>
    }
}

/// Page footer
#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="footer">
            <div class="brand">"LEADSIG" <span class="brand-accent">" CRM"</span></div>
            <p class="footer-note">"© 2024 LeadSig. Founders Lifetime Deal (Cohort 001)"</p>
            <div class="footer-links">
                <a href="#">"Privacy"</a>
                <a href="#">"Terms"</a>
                <a href="#">"Contact"</a>
            </div>
        </footer>
    }
}

/// Email/password sign-in and sign-up form
///
/// Google sign-in arrives through the GIS callback exported from the crate
/// root, not through this form.
#[component]
pub fn AuthForm() -> impl IntoView {
    let session = SessionContext::expect();

    let (registering, set_registering) = signal(false);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (display_name, set_display_name) = signal(String::new());

    let submit = move |_| {
        if registering.get() {
            session.sign_up(email.get(), password.get(), display_name.get());
        } else {
            session.sign_in(email.get(), password.get());
        }
    };

    view! {
        <div class="auth-form">
            <h3>{move || if registering.get() { "Create your account" } else { "Sign in" }}</h3>

            <Show when=move || registering.get()>
                <div class="field">
                    <label>"Display Name"</label>
                    <input
                        type="text"
                        placeholder="Joe Foreman"
                        prop:value=move || display_name.get()
                        on:input=move |ev| set_display_name.set(event_target_value(&ev))
                    />
                </div>
            </Show>

            <div class="field">
                <label>"Email"</label>
                <input
                    type="email"
                    placeholder="operator@landscaper.com"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
            </div>

            <div class="field">
                <label>"Password"</label>
                <input
                    type="password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </div>

            {move || {
                session
                    .error()
                    .get()
                    .map(|message| view! { <p class="form-error">{message}</p> })
            }}

            <button class="btn btn-primary" on:click=submit disabled=move || session.busy().get()>
                {move || {
                    if session.busy().get() {
                        "…"
                    } else if registering.get() {
                        "Create Account"
                    } else {
                        "Sign In"
                    }
                }}
            </button>

            <button class="btn btn-ghost" on:click=move |_| set_registering.update(|r| *r = !*r)>
                {move || {
                    if registering.get() {
                        "Already registered? Sign in"
                    } else {
                        "New here? Create an account"
                    }
                }}
            </button>
        </div>
    }
}

/// Deposit state pill for the admin table
#[component]
pub fn DepositBadge(paid: bool) -> impl IntoView {
    let (class, label) = if paid {
        ("badge badge-paid", "Paid")
    } else {
        ("badge badge-pending", "Pending")
    };
    view! { <span class=class>{label}</span> }
}

/// Trial state pill for the admin table
#[component]
pub fn TrialBadge(status: TrialStatus) -> impl IntoView {
    let class = match status {
        TrialStatus::Active => "badge badge-active",
        TrialStatus::Completed => "badge badge-completed",
        TrialStatus::Pending | TrialStatus::Cancelled => "badge badge-inactive",
    };
    view! { <span class=class>{status.as_str()}</span> }
}
