//! Views, navigation and the guard in front of them.

pub mod guard;
pub mod navigator;
pub mod route;

use tracing::info;

pub use guard::{DenyReason, GuardDecision, RouteGuard};
pub use navigator::{Navigator, ViewScope};
pub use route::Route;

use crate::session::SessionStore;

/// Guarded navigation: every user-initiated move goes through [`RouteGuard::check`].
#[derive(Clone)]
pub struct Router {
    navigator: Navigator,
    guard: RouteGuard,
}

impl Router {
    pub fn new(session: SessionStore) -> Self {
        Self {
            navigator: session.navigator().clone(),
            guard: RouteGuard::new(session),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Enter `route` and return the scope of the new view.
    ///
    /// When the guard denies entry the navigator moves to the redirect target
    /// instead and the reason is returned.
    pub fn navigate(&self, route: Route) -> Result<ViewScope, DenyReason> {
        match self.guard.check(route) {
            GuardDecision::Allow => {
                self.navigator.go(route);
                Ok(self.navigator.scope())
            }
            GuardDecision::Redirect { to, reason } => {
                info!(requested = %route, redirect = %to, %reason, "Redirected");
                self.navigator.go(to);
                Err(reason)
            }
        }
    }

    pub fn navigate_to_path(&self, path: &str) -> Result<ViewScope, DenyReason> {
        self.navigate(Route::parse(path))
    }
}
