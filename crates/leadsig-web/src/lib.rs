//! LeadSig Web Frontend
//!
//! Leptos-based WASM frontend for the founders portal: marketing landing
//! page, setup guides, payment-success page, and the cohort admin portal.

mod app;
mod components;
mod config;
mod pages;
mod router;
mod session;

pub use app::App;
pub use config::AppConfig;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}

thread_local! {
    static GOOGLE_CREDENTIAL_SINK: RefCell<Option<Box<dyn Fn(String)>>> =
        const { RefCell::new(None) };
}

/// Install the handler federated credentials are forwarded to
pub(crate) fn set_google_credential_sink(sink: impl Fn(String) + 'static) {
    GOOGLE_CREDENTIAL_SINK.with(|cell| {
        *cell.borrow_mut() = Some(Box::new(sink));
    });
}

/// Entry point for the Google Identity Services callback
///
/// The hosting page's GIS snippet calls this with the credential (a Google
/// ID token); the app exchanges it for a Firebase session.
#[wasm_bindgen]
pub fn google_credential(id_token: String) {
    GOOGLE_CREDENTIAL_SINK.with(|cell| {
        if let Some(sink) = cell.borrow().as_ref() {
            sink(id_token);
        }
    });
}
