//! Admin Portal
//!
//! Cohort management for operators in the admin registry: a live table of
//! founder profiles with deposit, trial, and launch-access controls. All
//! state comes from the store subscription; the table never renders an
//! optimistic value.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use leptos::prelude::*;
use leptos::task::spawn_local;

use leadsig_core::{CohortQuery, Profile, TrialStatus, UserId};

use crate::components::{AuthForm, DepositBadge, TrialBadge};
use crate::config::AppConfig;
use crate::session::SessionContext;

#[derive(Clone, Copy)]
enum RowAction {
    VerifyDeposit,
    StartTrial,
    StopTrial,
    EnableLaunchAccess,
}

/// Run one row action against the store, surfacing failures in the banner
///
/// The subscription publishes the updated snapshot after the write lands,
/// so there is nothing to apply locally on success.
fn run_row_action(
    session: SessionContext,
    banner: RwSignal<Option<String>>,
    uid: UserId,
    action: RowAction,
) {
    let store = session.store();
    spawn_local(async move {
        let result = match action {
            RowAction::VerifyDeposit => store.verify_deposit(&uid).await,
            RowAction::StartTrial => store.start_trial(&uid).await,
            RowAction::StopTrial => store.stop_trial(&uid).await,
            RowAction::EnableLaunchAccess => store.enable_launch_access(&uid).await,
        };
        match result {
            Ok(_) => banner.set(None),
            Err(err) => banner.set(Some(err.user_message())),
        }
    });
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let session = SessionContext::expect();
    let user = session.user();

    // None while the registry lookup is in flight or nobody is signed in.
    let admin_state = RwSignal::new(None::<bool>);
    Effect::new(move |_| match user.get() {
        None => admin_state.set(None),
        Some(auth_user) => {
            let registry = session.admin_registry();
            spawn_local(async move {
                let verdict = registry.is_admin(&auth_user.uid).await;
                admin_state.set(Some(verdict));
            });
        }
    });

    view! {
        <div class="admin">
            <h1>"Admin Portal"</h1>
            {move || match (user.get().is_some(), admin_state.get()) {
                (false, _) => {
                    view! {
                        <section class="admin-gate">
                            <p>"Sign in with an administrator account to manage the cohort."</p>
                            <AuthForm />
                        </section>
                    }
                        .into_any()
                }
                (true, None) => view! { <p class="admin-checking">"Checking permissions…"</p> }.into_any(),
                (true, Some(false)) => {
                    view! {
                        <section class="admin-gate admin-denied">
                            <h2>"Access Denied"</h2>
                            <p>"This account is not in the admin registry."</p>
                        </section>
                    }
                        .into_any()
                }
                (true, Some(true)) => view! { <CohortTable /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn CohortTable() -> impl IntoView {
    let session = SessionContext::expect();
    let config = expect_context::<AppConfig>();

    let rows = RwSignal::new(Vec::<Profile>::new());
    let banner = RwSignal::new(None::<String>);

    // Follow cohort snapshots for as long as the table is mounted. The
    // flag stops the loop on unmount, which drops the subscription.
    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        let store = session.store();
        spawn_local(async move {
            match store.subscribe_cohort(CohortQuery::default()).await {
                Ok(mut subscription) => {
                    while let Some(snapshot) = subscription.next().await {
                        if cancelled.load(Ordering::Relaxed) {
                            break;
                        }
                        rows.set(snapshot);
                    }
                }
                Err(err) => banner.set(Some(err.user_message())),
            }
        });
    }
    on_cleanup(move || cancelled.store(true, Ordering::Relaxed));

    let seat_cap = config.seat_cap;
    let claimed = move || format!("{} / {} Spots Claimed", rows.get().len(), seat_cap);

    view! {
        <section class="cohort">
            <div class="cohort-summary">
                <div class="cohort-count">{claimed}</div>
                <div class="cohort-label">{config.cohort_label.clone()}</div>
            </div>

            <Show when=move || banner.get().is_some()>
                <div class="banner banner-error">{move || banner.get()}</div>
            </Show>

            <table class="cohort-table">
                <thead>
                    <tr>
                        <th>"Founder"</th>
                        <th>"Joined"</th>
                        <th>"Deposit"</th>
                        <th>"Trial"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        rows.get()
                            .into_iter()
                            .map(|profile| view! { <CohortRow profile banner /> })
                            .collect_view()
                    }}
                </tbody>
            </table>
        </section>
    }
}

#[component]
fn CohortRow(profile: Profile, banner: RwSignal<Option<String>>) -> impl IntoView {
    let session = SessionContext::expect();

    let joined = profile
        .created_at
        .map(|t| t.format("%b %e, %Y").to_string())
        .unwrap_or_else(|| "pending".to_string());
    let name = profile
        .display_name
        .clone()
        .unwrap_or_else(|| profile.email.clone());

    let can_verify = profile.can_verify_deposit();
    let can_toggle = profile.can_toggle_trial();
    let trial_active = profile.trial_status == TrialStatus::Active;
    let launch_done = profile.launch_access;

    let verify_uid = profile.uid.clone();
    let trial_uid = profile.uid.clone();
    let launch_uid = profile.uid.clone();

    view! {
        <tr>
            <td>
                <div class="founder-name">{name}</div>
                <div class="founder-email">{profile.email.clone()}</div>
            </td>
            <td>{joined}</td>
            <td><DepositBadge paid=profile.deposit_paid /></td>
            <td><TrialBadge status=profile.trial_status /></td>
            <td class="row-actions">
                <button
                    class="btn btn-small"
                    disabled=!can_verify
                    on:click=move |_| {
                        run_row_action(
                            session,
                            banner,
                            verify_uid.clone(),
                            RowAction::VerifyDeposit,
                        )
                    }
                >
                    "Verify Deposit"
                </button>
                <button
                    class="btn btn-small"
                    disabled=!can_toggle
                    on:click=move |_| {
                        let action = if trial_active {
                            RowAction::StopTrial
                        } else {
                            RowAction::StartTrial
                        };
                        run_row_action(session, banner, trial_uid.clone(), action)
                    }
                >
                    {if trial_active { "Stop Trial" } else { "Start Trial" }}
                </button>
                <button
                    class="btn btn-small"
                    disabled=launch_done
                    on:click=move |_| {
                        run_row_action(
                            session,
                            banner,
                            launch_uid.clone(),
                            RowAction::EnableLaunchAccess,
                        )
                    }
                >
                    "Enable Launch Access"
                </button>
            </td>
        </tr>
    }
}
