//! Session Context
//!
//! Bridges `leadsig_core::Session` into the reactive world: signals mirror
//! the session state for rendering, and the async identity operations run
//! through `spawn_local` with a single-in-flight busy guard.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use leadsig_core::{AdminRegistry, AuthService, AuthUser, Profile, ProfileStore, Session};

/// Reactive handle to the portal session, provided via Leptos context
///
/// Copyable: the non-Send pieces live in local storage behind `StoredValue`
/// handles. Renders read the mirrored signals; only the guarded operations
/// touch the inner cell, so no borrow is ever held while another starts.
#[derive(Clone, Copy)]
pub struct SessionContext {
    user: RwSignal<Option<AuthUser>>,
    profile: RwSignal<Option<Profile>>,
    busy: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    inner: StoredValue<Rc<RefCell<Session>>, LocalStorage>,
    admin: StoredValue<Rc<dyn AdminRegistry>, LocalStorage>,
}

impl SessionContext {
    /// Build the session from its dependencies and provide it as context
    pub fn provide(
        auth: Rc<dyn AuthService>,
        store: Rc<dyn ProfileStore>,
        admin: Rc<dyn AdminRegistry>,
    ) -> Self {
        let context = Self {
            user: RwSignal::new(None),
            profile: RwSignal::new(None),
            busy: RwSignal::new(false),
            error: RwSignal::new(None),
            inner: StoredValue::new_local(Rc::new(RefCell::new(Session::new(auth, store)))),
            admin: StoredValue::new_local(admin),
        };
        provide_context(context);
        context
    }

    /// Fetch the context installed by the app shell
    pub fn expect() -> Self {
        expect_context::<Self>()
    }

    /// Signed-in identity
    pub fn user(&self) -> RwSignal<Option<AuthUser>> {
        self.user
    }

    /// Signed-in identity's profile
    pub fn profile(&self) -> RwSignal<Option<Profile>> {
        self.profile
    }

    /// Whether an identity operation is in flight
    pub fn busy(&self) -> RwSignal<bool> {
        self.busy
    }

    /// Most recent operation failure, displayable
    pub fn error(&self) -> RwSignal<Option<String>> {
        self.error
    }

    /// The profile store behind this session
    pub fn store(&self) -> Rc<dyn ProfileStore> {
        self.inner.get_value().borrow().store()
    }

    /// The admin capability registry
    pub fn admin_registry(&self) -> Rc<dyn AdminRegistry> {
        self.admin.get_value()
    }

    /// Copy session state into the render signals
    fn sync(self, cell: &RefCell<Session>) {
        let session = cell.borrow();
        self.user.set(session.user().cloned());
        self.profile.set(session.profile().cloned());
        self.error.set(session.last_error().map(str::to_string));
    }

    /// Run one guarded operation against the inner session
    fn run<F, Fut>(self, op: F)
    where
        F: FnOnce(Rc<RefCell<Session>>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        if self.busy.get_untracked() {
            return;
        }
        self.busy.set(true);
        let cell = self.inner.get_value();
        spawn_local(async move {
            op(Rc::clone(&cell)).await;
            self.sync(&cell);
            self.busy.set(false);
        });
    }

    pub fn sign_in(self, email: String, password: String) {
        self.run(move |cell| async move {
            let _ = cell.borrow_mut().sign_in(&email, &password).await;
        });
    }

    pub fn sign_up(self, email: String, password: String, display_name: String) {
        self.run(move |cell| async move {
            let _ = cell
                .borrow_mut()
                .sign_up(&email, &password, &display_name)
                .await;
        });
    }

    pub fn sign_in_with_google(self, id_token: String) {
        self.run(move |cell| async move {
            let _ = cell.borrow_mut().sign_in_with_google(&id_token).await;
        });
    }

    pub fn sign_out(self) {
        self.run(move |cell| async move {
            let _ = cell.borrow_mut().sign_out().await;
        });
    }

    pub fn refresh_profile(self) {
        self.run(move |cell| async move {
            let _ = cell.borrow_mut().refresh_profile().await;
        });
    }
}
