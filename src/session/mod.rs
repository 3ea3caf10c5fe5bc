//! Session state container.
//!
//! [`SessionStore`] is the single source of truth for whether a user is signed in.
//! It owns the bearer token and the cached profile, persists both through a
//! [`KeyValueStore`], and publishes every change on a `watch` channel so views can
//! re-render. The network side of the session (login, profile refresh) lives in
//! [`crate::api::auth::AuthService`].

pub mod storage;

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::models::{Profile, Role};
use crate::router::Navigator;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the serialized profile.
pub const PROFILE_KEY: &str = "currentUser";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Profile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The cached profile, only while a token is held.
    pub fn profile(&self) -> Option<&Profile> {
        self.token.as_ref().and(self.user.as_ref())
    }
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<Session>,
    navigator: Navigator,
    // serializes check-and-mutate sequences
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Restore the persisted session, if any.
    pub fn open(storage: Arc<dyn KeyValueStore>, navigator: Navigator) -> Self {
        let session = load_session(storage.as_ref());
        if session.is_authenticated() {
            info!(
                user = session.user.as_ref().map(|u| u.email.as_str()).unwrap_or("-"),
                "Restored persisted session"
            );
        }

        let (state, _) = watch::channel(session);
        Self {
            inner: Arc::new(SessionInner {
                storage,
                state,
                navigator,
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.inner.state.borrow().profile().cloned()
    }

    /// True iff a token is held. The token is not validated against the backend.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// True iff a profile is cached and its role is one of `allowed`.
    pub fn has_role(&self, allowed: &[Role]) -> bool {
        self.inner
            .state
            .borrow()
            .profile()
            .map(|p| allowed.contains(&p.role))
            .unwrap_or(false)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.inner.navigator
    }

    /// Persist a freshly issued token. A cached profile from a previous user is dropped.
    ///
    /// The old profile is removed before the token is written, so disk never pairs the
    /// new token with the previous user's role. On failure the published session is
    /// unchanged.
    pub fn set_token(&self, token: &str) -> Result<(), ClientError> {
        let _guard = self.inner.write_lock.lock();
        let storage = self.inner.storage.as_ref();

        let previous_profile = storage.get(PROFILE_KEY).ok().flatten();
        storage.remove(PROFILE_KEY)?;
        if let Err(e) = storage.set(TOKEN_KEY, token) {
            if let Some(raw) = previous_profile {
                if let Err(e) = storage.set(PROFILE_KEY, &raw) {
                    warn!(error = %e, "Failed to restore persisted profile");
                }
            }
            return Err(e.into());
        }

        self.inner.state.send_replace(Session {
            token: Some(token.to_string()),
            user: None,
        });
        Ok(())
    }

    /// Persist and publish a refreshed profile.
    pub fn set_profile(&self, profile: Profile) -> Result<(), ClientError> {
        let _guard = self.inner.write_lock.lock();

        let serialized = serde_json::to_string(&profile)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        self.inner.storage.set(PROFILE_KEY, &serialized)?;

        self.inner.state.send_modify(|session| session.user = Some(profile));
        Ok(())
    }

    /// Clear token and profile, then redirect to the login view.
    ///
    /// Only the transition from signed-in to signed-out publishes and redirects, so
    /// concurrent callers (two requests failing with 401 at once) produce exactly one
    /// redirect. Returns whether this call performed the transition.
    pub fn logout(&self) -> bool {
        let cleared = {
            let _guard = self.inner.write_lock.lock();

            let current = self.inner.state.borrow().clone();
            if current == Session::default() {
                false
            } else {
                for key in [TOKEN_KEY, PROFILE_KEY] {
                    if let Err(e) = self.inner.storage.remove(key) {
                        warn!(error = %e, key, "Failed to remove persisted session entry");
                    }
                }
                self.inner.state.send_replace(Session::default());
                true
            }
        };

        if cleared {
            info!("Session cleared");
            self.inner.navigator.redirect_to_login();
        }
        cleared
    }
}

fn load_session(storage: &dyn KeyValueStore) -> Session {
    let token = match storage.get(TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.trim().is_empty()),
        Err(e) => {
            warn!(error = %e, "Failed to read persisted token");
            None
        }
    };

    let user = match storage.get(PROFILE_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<Profile>(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted profile");
                if let Err(e) = storage.remove(PROFILE_KEY) {
                    warn!(error = %e, "Failed to remove persisted profile");
                }
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "Failed to read persisted profile");
            None
        }
    };

    Session { token, user }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Route;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn profile(role: Role) -> Profile {
        Profile {
            id: 1,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role,
            is_active: true,
        }
    }

    fn store_with(storage: Arc<dyn KeyValueStore>) -> SessionStore {
        SessionStore::open(storage, Navigator::new(Route::Dashboard))
    }

    #[test]
    fn test_starts_anonymous() {
        let store = store_with(Arc::new(MemoryStore::new()));
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
        assert!(!store.has_role(Role::ALL.as_slice()));
    }

    #[test]
    fn test_token_and_profile_are_persisted() {
        let storage = Arc::new(MemoryStore::new());
        let store = store_with(storage.clone());

        store.set_token("tok-1").unwrap();
        store.set_profile(profile(Role::Manager)).unwrap();

        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        let raw = storage.get(PROFILE_KEY).unwrap().unwrap();
        assert!(raw.contains("gestionnaire"));

        let reopened = store_with(storage);
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.profile(), Some(profile(Role::Manager)));
    }

    #[test]
    fn test_session_survives_file_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(Arc::new(FileStore::new(dir.path())));
        store.set_token("tok-file").unwrap();
        store.set_profile(profile(Role::Admin)).unwrap();
        drop(store);

        let reopened = store_with(Arc::new(FileStore::new(dir.path())));
        assert_eq!(reopened.token().as_deref(), Some("tok-file"));
        assert!(reopened.has_role(&[Role::Admin]));
    }

    #[test]
    fn test_has_role() {
        let store = store_with(Arc::new(MemoryStore::new()));
        store.set_token("tok").unwrap();
        // token without profile grants no role
        assert!(!store.has_role(Role::ALL.as_slice()));

        store.set_profile(profile(Role::Contributor)).unwrap();
        assert!(store.has_role(&[Role::Contributor]));
        assert!(!store.has_role(Role::EDITORS));
    }

    #[test]
    fn test_new_token_drops_stale_profile() {
        let storage = Arc::new(MemoryStore::new());
        let store = store_with(storage.clone());
        store.set_token("old").unwrap();
        store.set_profile(profile(Role::Admin)).unwrap();

        store.set_token("new").unwrap();
        assert_eq!(store.profile(), None);
        assert_eq!(storage.get(PROFILE_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_clears_and_redirects_once() {
        let storage = Arc::new(MemoryStore::new());
        let store = store_with(storage.clone());
        store.set_token("tok").unwrap();
        store.set_profile(profile(Role::Admin)).unwrap();

        assert!(store.logout());
        assert!(!store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(PROFILE_KEY).unwrap(), None);
        assert_eq!(store.navigator().current(), Route::Login);

        // already logged out: no second redirect
        assert!(!store.logout());
        let redirects = store
            .navigator()
            .history()
            .into_iter()
            .filter(|r| *r == Route::Login)
            .count();
        assert_eq!(redirects, 1);
    }

    #[test]
    fn test_concurrent_logout_redirects_once() {
        let store = store_with(Arc::new(MemoryStore::new()));
        store.set_token("tok").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.logout())
            })
            .collect();
        let transitions = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|cleared| *cleared)
            .count();

        assert_eq!(transitions, 1);
        let redirects = store
            .navigator()
            .history()
            .into_iter()
            .filter(|r| *r == Route::Login)
            .count();
        assert_eq!(redirects, 1);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = store_with(Arc::new(MemoryStore::new()));
        let mut rx = store.subscribe();

        store.set_token("tok").unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        store.logout();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Session::default());
    }

    /// Memory store whose token writes and removals can be made to fail.
    #[derive(Default)]
    struct FailingStore {
        inner: MemoryStore,
        fail_token_set: AtomicBool,
        fail_remove: AtomicBool,
    }

    impl FailingStore {
        fn failure(key: &str) -> StorageError {
            StorageError::Write {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            }
        }
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == TOKEN_KEY && self.fail_token_set.load(Ordering::SeqCst) {
                return Err(Self::failure(key));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(Self::failure(key));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_failed_set_token_keeps_previous_session() {
        let storage = Arc::new(FailingStore::default());
        let store = store_with(storage.clone());
        store.set_token("admin-token").unwrap();
        store.set_profile(profile(Role::Admin)).unwrap();

        storage.fail_remove.store(true, Ordering::SeqCst);
        assert!(store.set_token("contributor-token").is_err());
        assert_eq!(store.token().as_deref(), Some("admin-token"));
        assert!(store.has_role(&[Role::Admin]));

        let reopened = store_with(storage.clone());
        assert_eq!(reopened.token().as_deref(), Some("admin-token"));
        assert_eq!(reopened.profile(), Some(profile(Role::Admin)));

        storage.fail_remove.store(false, Ordering::SeqCst);
        storage.fail_token_set.store(true, Ordering::SeqCst);
        assert!(store.set_token("contributor-token").is_err());
        assert_eq!(store.token().as_deref(), Some("admin-token"));

        storage.fail_token_set.store(false, Ordering::SeqCst);
        let reopened = store_with(storage);
        assert_eq!(reopened.token().as_deref(), Some("admin-token"));
        assert!(reopened.has_role(&[Role::Admin]));
    }

    #[test]
    fn test_corrupt_profile_is_discarded() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(PROFILE_KEY, "{not json").unwrap();

        let store = store_with(storage.clone());
        assert!(store.is_authenticated());
        assert_eq!(store.profile(), None);
        assert_eq!(storage.get(PROFILE_KEY).unwrap(), None);
    }
}
