//! Stages composed around every outbound request.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::{debug, warn};

use super::RequestContext;
use crate::error::ClientError;
use crate::session::SessionStore;

/// Transforms a request before it is sent.
pub trait RequestStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn prepare(
        &self,
        request: &mut reqwest::Request,
        ctx: &RequestContext,
    ) -> Result<(), ClientError>;
}

/// Reacts to a classified failure. Stages observe the error; they cannot replace it.
#[async_trait]
pub trait FailureStage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn on_failure(&self, ctx: &RequestContext, error: &ClientError);
}

/// Attaches the session's bearer token, when there is one.
pub struct BearerStage {
    session: SessionStore,
}

impl BearerStage {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl RequestStage for BearerStage {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn prepare(
        &self,
        request: &mut reqwest::Request,
        _ctx: &RequestContext,
    ) -> Result<(), ClientError> {
        let Some(token) = self.session.token() else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ClientError::InvalidRequest("Stored token is not a valid header value".into()))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Forces a logout when a session-bearing request is rejected with 401.
pub struct LogoutOnUnauthorized {
    session: SessionStore,
}

impl LogoutOnUnauthorized {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

#[async_trait]
impl FailureStage for LogoutOnUnauthorized {
    fn name(&self) -> &'static str {
        "logout-on-401"
    }

    async fn on_failure(&self, ctx: &RequestContext, error: &ClientError) {
        if ctx.auth_exempt || !matches!(error, ClientError::Unauthorized { .. }) {
            return;
        }
        if self.session.logout() {
            warn!(
                request_id = %ctx.request_id,
                path = %ctx.path,
                "Session rejected by server, signed out"
            );
        }
    }
}

/// Request and failure logging.
pub struct TraceStage;

impl RequestStage for TraceStage {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn prepare(
        &self,
        request: &mut reqwest::Request,
        ctx: &RequestContext,
    ) -> Result<(), ClientError> {
        debug!(
            request_id = %ctx.request_id,
            method = %request.method(),
            url = %request.url(),
            "Sending request"
        );
        Ok(())
    }
}

#[async_trait]
impl FailureStage for TraceStage {
    fn name(&self) -> &'static str {
        "trace"
    }

    async fn on_failure(&self, ctx: &RequestContext, error: &ClientError) {
        match error {
            ClientError::Network { cause, .. } => warn!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                path = %ctx.path,
                cause = %cause,
                "Request failed before a response was received"
            ),
            ClientError::Cancelled => debug!(
                request_id = %ctx.request_id,
                path = %ctx.path,
                "Request cancelled"
            ),
            other => warn!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                path = %ctx.path,
                status = ?other.status(),
                error = %other,
                "Request failed"
            ),
        }
    }
}
