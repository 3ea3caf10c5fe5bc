//! Request pipeline.
//!
//! Every call to the backend goes through [`Pipeline::send`]:
//!
//! 1. request stages run in order (`trace`, then `bearer` in the standard chain),
//! 2. the request is executed,
//! 3. a transport failure or non-2xx status is classified into a [`ClientError`],
//! 4. failure stages run in order (`logout-on-401`, then `trace`),
//! 5. the result is returned unchanged; nothing is retried.

pub mod stages;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::session::SessionStore;
pub use stages::{BearerStage, FailureStage, LogoutOnUnauthorized, RequestStage, TraceStage};

/// Per-request metadata visible to every stage.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub method: Method,
    pub path: String,
    /// Set on the login call: a 401 means bad credentials, not an expired session.
    pub auth_exempt: bool,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>, auth_exempt: bool) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            method,
            path: path.into(),
            auth_exempt,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    File {
        field: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// A backend call, described independently of the transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub auth_exempt: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            auth_exempt: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query = params;
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.body = RequestBody::File {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        };
        self
    }

    pub fn auth_exempt(mut self) -> Self {
        self.auth_exempt = true;
        self
    }
}

#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    client: reqwest::Client,
    base_url: Url,
    request_stages: Vec<Arc<dyn RequestStage>>,
    failure_stages: Vec<Arc<dyn FailureStage>>,
}

impl Pipeline {
    pub fn builder(base_url: Url) -> PipelineBuilder {
        PipelineBuilder {
            base_url,
            client: None,
            timeout: None,
            request_stages: Vec::new(),
            failure_stages: Vec::new(),
        }
    }

    /// The chain used by the console: trace, bearer / logout-on-401, trace.
    pub fn standard(config: &ApiConfig, session: SessionStore) -> Result<Self, ClientError> {
        let base_url = config.base_url()?;
        Self::builder(base_url)
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .request_stage(TraceStage)
            .request_stage(BearerStage::new(session.clone()))
            .failure_stage(LogoutOnUnauthorized::new(session))
            .failure_stage(TraceStage)
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Names of the request stages and failure stages, in execution order.
    pub fn stage_names(&self) -> (Vec<&'static str>, Vec<&'static str>) {
        (
            self.inner.request_stages.iter().map(|s| s.name()).collect(),
            self.inner.failure_stages.iter().map(|s| s.name()).collect(),
        )
    }

    pub fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid URL for {}: {}", path, e)))
    }

    /// Send a request through the stages and return the successful response.
    pub async fn send(&self, request: ApiRequest) -> Result<reqwest::Response, ClientError> {
        let ctx = RequestContext::new(request.method.clone(), &request.path, request.auth_exempt);
        match self.execute(request, &ctx).await {
            Ok(response) => Ok(response),
            Err(error) => {
                for stage in &self.inner.failure_stages {
                    stage.on_failure(&ctx, &error).await;
                }
                Err(error)
            }
        }
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| ClientError::Decode {
            message: format!("Unexpected response from {}: {}", path, e),
        })
    }

    /// Send a request whose response body is ignored (e.g. `204 No Content`).
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.send(request).await.map(|_| ())
    }

    async fn execute(
        &self,
        request: ApiRequest,
        ctx: &RequestContext,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.url_for(&request.path)?;
        let client = &self.inner.client;

        let mut builder = client.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::File {
                field,
                file_name,
                mime,
                bytes,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&mime)
                    .map_err(|e| ClientError::InvalidRequest(format!("Invalid content type: {}", e)))?;
                builder.multipart(reqwest::multipart::Form::new().part(field, part))
            }
        };

        let mut http_request = builder
            .build()
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        for stage in &self.inner.request_stages {
            stage.prepare(&mut http_request, ctx)?;
        }

        let response = client
            .execute(http_request)
            .await
            .map_err(|e| ClientError::network(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_response(status, &body, ctx.auth_exempt))
    }
}

pub struct PipelineBuilder {
    base_url: Url,
    client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    request_stages: Vec<Arc<dyn RequestStage>>,
    failure_stages: Vec<Arc<dyn FailureStage>>,
}

impl PipelineBuilder {
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn request_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.request_stages.push(Arc::new(stage));
        self
    }

    pub fn failure_stage(mut self, stage: impl FailureStage + 'static) -> Self {
        self.failure_stages.push(Arc::new(stage));
        self
    }

    pub fn build(self) -> Result<Pipeline, ClientError> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder()
                    .user_agent(concat!("assetdesk/", env!("CARGO_PKG_VERSION")));
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| ClientError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?
            }
        };

        Ok(Pipeline {
            inner: Arc::new(PipelineInner {
                client,
                base_url: self.base_url,
                request_stages: self.request_stages,
                failure_stages: self.failure_stages,
            }),
        })
    }
}
