//! Hash Router
//!
//! Feeds the current URL fragment through `leadsig_core::Route` and keeps a
//! signal in sync with `hashchange` events. Parsing itself lives in the
//! core crate; this module only touches the browser.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use leadsig_core::Route;

/// Reactive view over the URL fragment
#[derive(Clone, Copy)]
pub struct HashRouter {
    route: RwSignal<Route>,
}

impl HashRouter {
    /// Read the current fragment and start listening for changes
    pub fn new() -> Self {
        let route = RwSignal::new(Route::parse(&current_fragment()));

        let listener = Closure::<dyn FnMut()>::new(move || {
            route.set(Route::parse(&current_fragment()));
        });
        if window()
            .add_event_listener_with_callback("hashchange", listener.as_ref().unchecked_ref())
            .is_ok()
        {
            // The listener lives for the lifetime of the app.
            listener.forget();
        }

        Self { route }
    }

    /// The current route signal
    pub fn route(self) -> RwSignal<Route> {
        self.route
    }

    /// Navigate by rewriting the fragment (fires `hashchange`)
    pub fn navigate(self, path: &str, params: &[(&str, &str)]) {
        let _ = window()
            .location()
            .set_hash(&Route::format_fragment(path, params));
    }

    /// Drop the fragment without a page reload or a new history entry, and
    /// reset the observed route to empty
    pub fn clear(self) {
        let location = window().location();
        let bare = format!(
            "{}{}",
            location.pathname().unwrap_or_default(),
            location.search().unwrap_or_default()
        );
        if let Ok(history) = window().history() {
            let _ = history.replace_state_with_url(&JsValue::from_str(""), "", Some(&bare));
        }
        self.route.set(Route::default());
    }
}

fn current_fragment() -> String {
    window().location().hash().unwrap_or_default()
}
