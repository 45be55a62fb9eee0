//! Landing Page
//!
//! Static marketing copy for the founders deal. The only behavior here is
//! the CTA, which opens the hosted payment link.

use leptos::prelude::*;

const LOGISTICS_STEPS: [(&str, &str, &str); 4] = [
    (
        "Step 01",
        "Access Commitment",
        "Secure your spot in Cohort 001 with a $99.99 deposit today. This is not a purchase; it is a commitment to the infrastructure build-out.",
    ),
    (
        "Step 02",
        "Implementation Phase",
        "As a Founder, you work directly with our engineering team to map your business logic into the Gatekeeper Protocol.",
    ),
    (
        "Step 03",
        "7-Day Field Trial",
        "Once launch-ready, you get 7 days of live infrastructure testing. Run your actual business volume through LeadSig at zero additional cost.",
    ),
    (
        "Step 04",
        "Lifetime Lock-in",
        "After your trial, pay the remaining $399 to reach your $499 total. You are locked in for life. No monthly fees, ever. Or walk away and we refund your deposit.",
    ),
];

const MECHANISM_CARDS: [(&str, &str); 3] = [
    (
        "01. Structural Sorting",
        "Every lead is categorized by project type and revenue potential before ingestion.",
    ),
    (
        "02. Intent Verification",
        "Automated follow-ups force the prospect to verify financial readiness.",
    ),
    (
        "03. Alert Gating",
        "Your phone only rings when the protocol confirms the lead is worth your time.",
    ),
];

const FOR_YOU: [&str; 4] = [
    "You are an established operator with existing lead flow.",
    "You value long-term infrastructure over short-term \"apps\".",
    "You manage crews and jobs primarily from your phone.",
    "You are ready to stop \"chasing\" and start \"filtering\".",
];

const NOT_FOR_YOU: [&str; 4] = [
    "You are \"just looking\" for pricing options.",
    "You are a beginner without active project volume.",
    "You want to buy volume-leads (we don't sell data).",
    "You prioritize \"low cost\" over \"high control\".",
];

const FAQ: [(&str, &str); 4] = [
    (
        "Is the deposit a purchase?",
        "No. It's a commitment to secure your place in the first 100-operator cohort. We use this to fund the manual implementation of your protocol.",
    ),
    (
        "Can I get a refund?",
        "Yes. If during your 7-day field trial at launch you decide the infrastructure isn't for you, we refund the $99.99 deposit immediately.",
    ),
    (
        "What happens at launch?",
        "You'll be the first to go live. Our team will guide you through the switch from your current system to LeadSig's Gatekeeper Protocol.",
    ),
    (
        "Why only 100 spots?",
        "Infrastructure requires manual setup. To ensure every Founder is successful, we can only handle 100 implementations in the first cohort.",
    ),
];

#[component]
pub fn LandingPage(on_cta: Callback<()>) -> impl IntoView {
    view! {
        <div class="landing">
            <section class="hero">
                <div class="hero-badge">"Founder Cohort: 001 / Limited to 100 Seats"</div>
                <h1>"Simplify Your Workflow"</h1>
                <p class="hero-sub">"Streamline Your Business with Our Landscaping"</p>
                <p class="hero-sub">
                    <span class="accent-blue">"Industry"</span> " "
                    <span class="accent-green">"CRM Solutions"</span>
                </p>
                <div class="hero-lines">
                    <p>"All your leads in one place."</p>
                    <p>"Run entirely from your phone."</p>
                    <p>
                        "Personalized automation qualifies, confirms, and filters leads before anything hits your calendar."
                    </p>
                </div>
                <button class="btn btn-cta" on:click=move |_| on_cta.run(())>
                    "Start Free Trial"
                </button>
                <p class="hero-note">"$99.99 Commitment to Access"</p>
            </section>

            <section class="failure">
                <h2>"Software doesn't understand your overhead."</h2>
                <div class="failure-columns">
                    <div>
                        <p>
                            "Standard CRMs want you to respond to every ping in seconds. They call it \"speed-to-lead.\" But when you're 15 feet in the air or managing a crew of six, a notification for a $200 mulch job is just noise that costs you focus."
                        </p>
                        <p>
                            "Unfiltered demand destroys your margins. It fills your calendar with low-intent bids that steal your evening time and force your team to wait for direction while you chase \"window shoppers.\""
                        </p>
                    </div>
                    <div>
                        <p>
                            "If your system isn't stopping the noise before it hits your phone, it's not a tool; it's another job you have to manage. Dashboards don't dig holes, and they certainly don't close high-ticket hardscape jobs."
                        </p>
                        <p>
                            "We built LeadSig because busy operators don't need more \"leads.\" They need "
                            <strong>"Infrastructure"</strong>
                            " that protects their time and ensures only qualified, high-intent demand hits their calendar."
                        </p>
                    </div>
                </div>
            </section>

            <section class="mechanism">
                <h2 class="overline">"The Mechanism"</h2>
                <h3>"The Gatekeeper Protocol"</h3>
                <p class="mechanism-lede">
                    "LeadSig applies structural logic to every inbound signal, forcing prospects through a verification sequence that confirms budget and scope before you're ever alerted."
                </p>
                <p class="mechanism-note">
                    "This isn't \"AI magic.\" It's logic-based friction designed to filter out price shoppers automatically."
                </p>
                <div class="card-grid">
                    {MECHANISM_CARDS
                        .into_iter()
                        .map(|(title, body)| {
                            view! {
                                <div class="card">
                                    <div class="card-title">{title}</div>
                                    <div class="card-body">{body}</div>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </section>

            <section class="logistics">
                <h2>"Founder Access Logistics"</h2>
                <div class="timeline">
                    {LOGISTICS_STEPS
                        .into_iter()
                        .map(|(meta, title, body)| {
                            view! {
                                <div class="timeline-step">
                                    <div class="timeline-meta">{meta}</div>
                                    <h4>{title}</h4>
                                    <p>{body}</p>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </section>

            <section class="readiness">
                <h2>"Operational Readiness"</h2>
                <div class="readiness-columns">
                    <div class="panel panel-for">
                        <h4>"This is for you if:"</h4>
                        <ul>
                            {FOR_YOU.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                        </ul>
                    </div>
                    <div class="panel panel-against">
                        <h4>"Disqualified if:"</h4>
                        <ul>
                            {NOT_FOR_YOU
                                .into_iter()
                                .map(|line| view! { <li>{line}</li> })
                                .collect_view()}
                        </ul>
                    </div>
                </div>
            </section>

            <section class="scarcity">
                <h2>"The Quantified Cost of Waiting."</h2>
                <p class="scarcity-quote">
                    "\"We are limiting this to 100 operators because we aren't just giving you a login. We are manually configuring your infrastructure. Every lost estimate because you were 'too busy' is a bid you paid for but never collected.\""
                </p>
                <div class="card-grid">
                    <div class="card">
                        <div class="card-title">"Time Leakage"</div>
                        <p>
                            "The average operator loses 5-8 hours per week to low-intent estimates. At $100/hr, that's $32k/year in wasted time alone."
                        </p>
                    </div>
                    <div class="card">
                        <div class="card-title">"Opportunity Cost"</div>
                        <p>
                            "Missing a high-ticket hardscape lead because you were filtering mulch inquiries is a failure of infrastructure, not effort."
                        </p>
                    </div>
                </div>
            </section>

            <section class="closing">
                <h2>"Commit to Access."</h2>
                <p>"Stop managing leads. Start managing infrastructure."</p>
                <button class="btn btn-cta" on:click=move |_| on_cta.run(())>
                    "$99.99 Founder Deposit"
                </button>

                <div class="faq">
                    <h3>"Operator FAQ"</h3>
                    <div class="faq-grid">
                        {FAQ.into_iter()
                            .map(|(question, answer)| {
                                view! {
                                    <div class="faq-item">
                                        <div class="faq-question">{question}</div>
                                        <div class="faq-answer">{answer}</div>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </section>
        </div>
    }
}
