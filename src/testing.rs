//! Test fixtures: an in-process backend and a wired-up client context.

use axum::extract::Request;
use axum::middleware::{self, Next};
use parking_lot::Mutex;
use reqwest::Url;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::ApiConfig;
use crate::models::{Profile, Role};
use crate::pipeline::Pipeline;
use crate::router::{Navigator, Route};
use crate::session::{KeyValueStore, MemoryStore, SessionStore};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

/// Axum server on an ephemeral port that records every request it receives.
pub struct MockBackend {
    pub base_url: Url,
    seen: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl MockBackend {
    /// Serve `router`; routes are expected under `/api/v1`.
    pub async fn start(router: axum::Router) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let app = router.layer(middleware::from_fn(move |req: Request, next: Next| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().push(RecordedRequest {
                    method: req.method().to_string(),
                    path: req.uri().path().to_string(),
                    query: req.uri().query().map(str::to_string),
                    authorization: req
                        .headers()
                        .get(axum::http::header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                });
                next.run(req).await
            }
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{}/api/v1", addr)).unwrap(),
            seen,
            task,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.seen.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.seen.lock().last().and_then(|r| r.authorization.clone())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Session, navigator and pipeline wired the way the console wires them.
pub struct TestContext {
    pub storage: Arc<MemoryStore>,
    pub navigator: Navigator,
    pub session: SessionStore,
    pub pipeline: Pipeline,
}

impl TestContext {
    pub fn with_base_url(base_url: &str) -> Self {
        let storage = Arc::new(MemoryStore::new());
        let navigator = Navigator::new(Route::Dashboard);
        let session = SessionStore::open(storage.clone(), navigator.clone());
        let config = ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: Some(5),
        };
        let pipeline = Pipeline::standard(&config, session.clone()).unwrap();

        Self {
            storage,
            navigator,
            session,
            pipeline,
        }
    }

    pub fn against(backend: &MockBackend) -> Self {
        Self::with_base_url(backend.base_url.as_str())
    }

    /// Nothing listens on the discard port, so every request fails to connect.
    pub fn offline() -> Self {
        Self::with_base_url("http://127.0.0.1:9/api/v1")
    }

    pub fn sign_in(&self, token: &str) {
        self.sign_in_as(token, Role::Admin);
    }

    pub fn sign_in_as(&self, token: &str, role: Role) {
        self.session.set_token(token).unwrap();
        self.session.set_profile(profile(role)).unwrap();
    }

    pub fn persisted(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap()
    }
}

pub fn profile(role: Role) -> Profile {
    Profile {
        id: 1,
        email: "admin@example.com".to_string(),
        first_name: "Alice".to_string(),
        last_name: "Martin".to_string(),
        role,
        is_active: true,
    }
}
