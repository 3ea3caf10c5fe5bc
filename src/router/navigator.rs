//! Current location, navigation history and per-view cancellation.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Route;
use crate::error::ClientError;

/// Entries kept in the navigation history; older ones are dropped.
pub const HISTORY_LIMIT: usize = 64;

/// Moves the console between views.
///
/// Every navigation cancels the [`ViewScope`] of the view being left, so requests
/// issued by that view can no longer update its state.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

struct NavigatorInner {
    location: watch::Sender<Route>,
    history: Mutex<Vec<Route>>,
    scope: Mutex<CancellationToken>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (location, _) = watch::channel(initial);
        Self {
            inner: Arc::new(NavigatorInner {
                location,
                history: Mutex::new(vec![initial]),
                scope: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    pub fn current(&self) -> Route {
        *self.inner.location.borrow()
    }

    /// The last [`HISTORY_LIMIT`] routes entered, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.inner.history.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.inner.location.subscribe()
    }

    /// Enter `route` without consulting the guard.
    ///
    /// Use [`super::Router::navigate`] for user-initiated navigation.
    pub fn go(&self, route: Route) {
        {
            let mut scope = self.inner.scope.lock();
            scope.cancel();
            *scope = CancellationToken::new();
        }
        {
            let mut history = self.inner.history.lock();
            if history.len() == HISTORY_LIMIT {
                history.remove(0);
            }
            history.push(route);
        }
        self.inner.location.send_replace(route);
        debug!(route = %route, "Navigated");
    }

    pub fn redirect_to_login(&self) {
        self.go(Route::Login);
    }

    /// Scope of the view currently displayed.
    pub fn scope(&self) -> ViewScope {
        ViewScope {
            token: self.inner.scope.lock().clone(),
        }
    }
}

/// Lifetime of a single view.
#[derive(Clone, Debug)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    /// A scope that is never cancelled by navigation.
    pub fn detached() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Run a request for this view; resolves to [`ClientError::Cancelled`] once the
    /// view is left, dropping the in-flight request.
    pub async fn run<T, F>(&self, request: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ClientError::Cancelled),
            result = request => result,
        }
    }
}
