//! Setup Guides
//!
//! Operator-facing walkthroughs for wiring the portal to its providers:
//! the hosted checkout, the Firebase backend, and GCP hosting. Content is
//! static; each guide links to the next stage of the rollout.

use leptos::prelude::*;

use crate::app::AppView;

struct GuideStep {
    title: &'static str,
    body: &'static [&'static str],
}

#[component]
fn Guide(
    overline: &'static str,
    title: &'static str,
    intro: &'static str,
    steps: &'static [GuideStep],
    next_label: &'static str,
    next: AppView,
) -> impl IntoView {
    let view = expect_context::<RwSignal<AppView>>();

    view! {
        <div class="guide">
            <div class="overline">{overline}</div>
            <h1>{title}</h1>
            <p class="guide-intro">{intro}</p>

            <ol class="guide-steps">
                {steps
                    .iter()
                    .map(|step| {
                        view! {
                            <li class="guide-step">
                                <h3>{step.title}</h3>
                                {step.body.iter().map(|line| view! { <p>{*line}</p> }).collect_view()}
                            </li>
                        }
                    })
                    .collect_view()}
            </ol>

            <button class="btn btn-cta" on:click=move |_| view.set(next)>
                {next_label}
            </button>
        </div>
    }
}

const STRIPE_STEPS: &[GuideStep] = &[
    GuideStep {
        title: "Create the Founder Deposit product",
        body: &[
            "In the Stripe dashboard, create a one-time product named \"LeadSig Founder Deposit\" priced at $99.99.",
            "Use a clear statement descriptor so the charge is recognizable on the operator's card statement.",
        ],
    },
    GuideStep {
        title: "Create a Payment Link",
        body: &[
            "Generate a Payment Link for the product. Under \"After payment\", choose \"Don't show confirmation page\" and redirect to your deployed portal.",
            "Append the session ID to the redirect URL so the portal can tie the payment to the account: https://your-domain/#/success?session_id={CHECKOUT_SESSION_ID}",
            "Stripe substitutes the placeholder with the real checkout session ID (cs_live_... or cs_test_...) at redirect time.",
        ],
    },
    GuideStep {
        title: "Tag the payment as a founder deposit",
        body: &[
            "Add metadata to the Payment Link: cohort=founders_100, type=deposit. This keeps cohort payments queryable in Stripe when you reconcile.",
        ],
    },
    GuideStep {
        title: "Plan the balance invoice",
        body: &[
            "The remaining $399 is collected by invoice after the 7-day field trial, not through the portal.",
            "Create an invoice template now so trial completions can be billed the same day.",
        ],
    },
];

const FIREBASE_STEPS: &[GuideStep] = &[
    GuideStep {
        title: "Create the project and web app",
        body: &[
            "Create a Firebase project, register a web app, and note the web API key and project ID for the frontend configuration.",
            "The web API key is public; all access control lives in security rules.",
        ],
    },
    GuideStep {
        title: "Enable authentication providers",
        body: &[
            "Turn on Email/Password and Google sign-in in the Authentication panel, and add your deployed domain to the authorized domains list.",
        ],
    },
    GuideStep {
        title: "Define the Firestore schema",
        body: &[
            "Profiles live in users/{uid} with: email, displayName, createdAt, founderStatus, founderCohort, depositPaid, stripeSessionId, trialStatus, trialStartDate, launchAccessEnabled.",
            "Admin membership is an existence check on admins/{uid}; create a document there for each operator who should see the portal.",
        ],
    },
    GuideStep {
        title: "Lock down security rules",
        body: &[
            "Users may read their own document and write only stripeSessionId. Deposit verification, trial controls, and launch access are admin-only writes.",
            "The cohort listing (founderStatus == true, ordered by createdAt) needs a composite index; Firestore prompts with a creation link on first query.",
        ],
    },
    GuideStep {
        title: "Choose a deposit verification path",
        body: &[
            "Option A (manual): when a payment lands, look up the stripeSessionId in Stripe and press \"Verify Deposit\" in the admin portal. Fine at cohort scale.",
            "Option B (webhook): a checkout.session.completed webhook can set depositPaid automatically. That requires server-side code and is deliberately out of scope for the first cohort.",
        ],
    },
];

const DEPLOYMENT_STEPS: &[GuideStep] = &[
    GuideStep {
        title: "Build the WASM bundle",
        body: &[
            "Build the frontend with trunk in release mode. The output is a static bundle: index.html, the .wasm module, and the JS glue.",
        ],
    },
    GuideStep {
        title: "Option A: Firebase Hosting",
        body: &[
            "The simplest path. firebase init hosting, point it at the build output directory, firebase deploy. You get TLS and a CDN with zero configuration.",
        ],
    },
    GuideStep {
        title: "Option B: Cloud Run",
        body: &[
            "If you want everything in one GCP project with future server-side room, serve the bundle from a minimal container behind Cloud Run.",
            "For a static bundle this buys nothing over Hosting; choose it only if a webhook backend is on your roadmap.",
        ],
    },
    GuideStep {
        title: "Launch checklist",
        body: &[
            "Swap the test payment link for the live one. Verify the redirect lands on #/success with a cs_live_ session ID.",
            "Confirm the authorized domains include production, the Firestore index exists, and your admin document is in place.",
        ],
    },
];

#[component]
pub fn StripeGuidePage() -> impl IntoView {
    view! {
        <Guide
            overline="Setup 1 of 3"
            title="Stripe Setup"
            intro="Configure the hosted checkout that collects the founder deposit and redirects back to the portal."
            steps=STRIPE_STEPS
            next_label="Next: Firebase Setup"
            next=AppView::FirebaseGuide
        />
    }
}

#[component]
pub fn FirebaseGuidePage() -> impl IntoView {
    view! {
        <Guide
            overline="Setup 2 of 3"
            title="Firebase Setup"
            intro="Stand up authentication and the Firestore collections the portal reads and writes."
            steps=FIREBASE_STEPS
            next_label="Next: GCP Deployment"
            next=AppView::DeploymentGuide
        />
    }
}

#[component]
pub fn DeploymentGuidePage() -> impl IntoView {
    view! {
        <Guide
            overline="Setup 3 of 3"
            title="GCP Deployment"
            intro="Ship the static bundle and run through the launch checklist."
            steps=DEPLOYMENT_STEPS
            next_label="Open the Admin Portal"
            next=AppView::Admin
        />
    }
}
