//! Login, profile refresh and logout.
//!
//! [`AuthService`] is the network half of the session: it talks to `/auth/*` and
//! records the outcome in the [`SessionStore`].

use tracing::{info, warn};

use crate::error::ClientError;
use crate::models::{Credential, Profile, Role, TokenResponse};
use crate::pipeline::{ApiRequest, Pipeline};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AuthService {
    pipeline: Pipeline,
    session: SessionStore,
}

impl AuthService {
    pub fn new(pipeline: Pipeline, session: SessionStore) -> Self {
        Self { pipeline, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Exchange credentials for a token, persist it, then load the profile.
    ///
    /// A rejected login leaves the existing session untouched. The profile request is
    /// only issued once the new token is stored, so it always carries that token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, ClientError> {
        let request = ApiRequest::post("/auth/login")
            .form(vec![
                ("username".to_string(), email.to_string()),
                ("password".to_string(), password.to_string()),
            ])
            .auth_exempt();

        let response: TokenResponse = match self.pipeline.send_json(request).await {
            Ok(response) => response,
            Err(ClientError::Unauthorized { message }) => {
                return Err(ClientError::InvalidCredentials { message })
            }
            Err(e) => return Err(e),
        };
        let credential = Credential::from(response);

        self.session.set_token(&credential.token)?;
        info!(user = email, "Signed in");

        match self.fetch_profile().await {
            Ok(_) => {}
            // the pipeline has already signed out
            Err(e @ ClientError::Unauthorized { .. }) => return Err(e),
            Err(e) => warn!(error = %e, "Signed in but failed to load profile"),
        }
        Ok(credential)
    }

    /// Load the current user's profile with the stored token.
    pub async fn fetch_profile(&self) -> Result<Profile, ClientError> {
        let profile: Profile = self.pipeline.send_json(ApiRequest::get("/auth/me")).await?;
        self.session.set_profile(profile.clone())?;
        Ok(profile)
    }

    /// Fetch the profile when a token is held without one, e.g. after a restart that
    /// lost the cached profile.
    pub async fn ensure_profile(&self) -> Result<Option<Profile>, ClientError> {
        let session = self.session.snapshot();
        if !session.is_authenticated() {
            return Ok(None);
        }
        if let Some(profile) = session.profile() {
            return Ok(Some(profile.clone()));
        }
        self.fetch_profile().await.map(Some)
    }

    pub fn logout(&self) -> bool {
        self.session.logout()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn has_role(&self, allowed: &[Role]) -> bool {
        self.session.has_role(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::router::Route;
    use crate::testing::{profile, MockBackend, TestContext};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Form, Json};
    use serde_json::json;
    use std::collections::HashMap;

    fn me_for(expected_token: &'static str) -> axum::routing::MethodRouter {
        get(move |headers: HeaderMap| async move {
            let authorization = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if authorization == format!("Bearer {}", expected_token) {
                (
                    StatusCode::OK,
                    Json(json!({
                        "id": 7,
                        "email": "u@x.com",
                        "first_name": "Lina",
                        "last_name": "Benali",
                        "role": "gestionnaire",
                        "is_active": true
                    })),
                )
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "detail": "Could not validate credentials" })),
                )
            }
        })
    }

    fn auth_backend() -> axum::Router {
        axum::Router::new()
            .route(
                "/api/v1/auth/login",
                post(|Form(form): Form<HashMap<String, String>>| async move {
                    if form.get("username").map(String::as_str) == Some("u@x.com")
                        && form.get("password").map(String::as_str) == Some("good")
                    {
                        (
                            StatusCode::OK,
                            Json(json!({ "access_token": "fresh-token", "token_type": "bearer" })),
                        )
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "detail": "Incorrect email or password" })),
                        )
                    }
                }),
            )
            .route("/api/v1/auth/me", me_for("fresh-token"))
    }

    #[tokio::test]
    async fn test_login_persists_token_and_profile() {
        let backend = MockBackend::start(auth_backend()).await;
        let ctx = TestContext::against(&backend);
        let auth = AuthService::new(ctx.pipeline.clone(), ctx.session.clone());

        let credential = auth.login("u@x.com", "good").await.unwrap();
        assert_eq!(credential.token, "fresh-token");
        assert!(auth.is_authenticated());
        assert_eq!(ctx.persisted("token").as_deref(), Some("fresh-token"));

        let user = ctx.session.profile().unwrap();
        assert_eq!(user.email, "u@x.com");
        assert_eq!(user.role, Role::Manager);
        assert!(ctx.persisted("currentUser").is_some());
        assert!(auth.has_role(Role::EDITORS));
    }

    #[tokio::test]
    async fn test_profile_fetch_uses_new_token() {
        let backend = MockBackend::start(auth_backend()).await;
        let ctx = TestContext::against(&backend);
        ctx.sign_in("previous-token");
        let auth = AuthService::new(ctx.pipeline.clone(), ctx.session.clone());

        auth.login("u@x.com", "good").await.unwrap();

        let me = backend.requests_to("/api/v1/auth/me");
        assert_eq!(me.len(), 1);
        assert_eq!(me[0].authorization.as_deref(), Some("Bearer fresh-token"));
        let login = backend.requests_to("/api/v1/auth/login");
        assert_eq!(login[0].method, "POST");
        assert_eq!(ctx.session.profile().unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_bad_password_leaves_session_untouched() {
        let backend = MockBackend::start(auth_backend()).await;
        let ctx = TestContext::against(&backend);
        let auth = AuthService::new(ctx.pipeline.clone(), ctx.session.clone());

        let err = auth.login("u@x.com", "bad").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(err.message(), "Incorrect email or password");
        assert!(!auth.is_authenticated());
        assert_eq!(ctx.persisted("token"), None);
        assert_eq!(ctx.navigator.history(), vec![Route::Dashboard]);
        assert!(backend.requests_to("/api/v1/auth/me").is_empty());
    }

    #[tokio::test]
    async fn test_bad_password_keeps_existing_session() {
        let backend = MockBackend::start(auth_backend()).await;
        let ctx = TestContext::against(&backend);
        ctx.sign_in("existing");
        let auth = AuthService::new(ctx.pipeline.clone(), ctx.session.clone());

        auth.login("u@x.com", "bad").await.unwrap_err();
        assert_eq!(ctx.session.token().as_deref(), Some("existing"));
        assert_eq!(ctx.session.profile(), Some(profile(Role::Admin)));
        assert_eq!(ctx.navigator.current(), Route::Dashboard);
    }

    #[tokio::test]
    async fn test_login_unreachable_backend() {
        let ctx = TestContext::offline();
        let auth = AuthService::new(ctx.pipeline.clone(), ctx.session.clone());

        let err = auth.login("u@x.com", "good").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_profile_signs_out() {
        let backend = MockBackend::start(
            axum::Router::new()
                .route(
                    "/api/v1/auth/login",
                    post(|| async {
                        Json(json!({ "access_token": "fresh-token", "token_type": "bearer" }))
                    }),
                )
                .route("/api/v1/auth/me", me_for("some-other-token")),
        )
        .await;
        let ctx = TestContext::against(&backend);
        let auth = AuthService::new(ctx.pipeline.clone(), ctx.session.clone());

        let err = auth.login("u@x.com", "good").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(!auth.is_authenticated());
        assert_eq!(ctx.navigator.current(), Route::Login);
    }

    #[tokio::test]
    async fn test_is_authenticated_follows_login_and_logout() {
        let backend = MockBackend::start(auth_backend()).await;
        let ctx = TestContext::against(&backend);
        let auth = AuthService::new(ctx.pipeline.clone(), ctx.session.clone());

        assert!(!auth.is_authenticated());
        auth.login("u@x.com", "good").await.unwrap();
        assert!(auth.is_authenticated());
        assert!(auth.logout());
        assert!(!auth.is_authenticated());
        assert!(!auth.logout());
    }

    #[tokio::test]
    async fn test_ensure_profile() {
        let backend = MockBackend::start(auth_backend()).await;
        let ctx = TestContext::against(&backend);
        let auth = AuthService::new(ctx.pipeline.clone(), ctx.session.clone());

        assert_eq!(auth.ensure_profile().await.unwrap(), None);
        assert!(backend.requests().is_empty());

        ctx.session.set_token("fresh-token").unwrap();
        let fetched = auth.ensure_profile().await.unwrap().unwrap();
        assert_eq!(fetched.first_name, "Lina");

        // cached now, no second request
        auth.ensure_profile().await.unwrap();
        assert_eq!(backend.requests_to("/api/v1/auth/me").len(), 1);
    }
}
