//! Typed clients for the inventory backend.
//!
//! Each resource (equipment, employees, locations) is described by a [`Resource`]
//! implementation and served by the generic [`ResourceClient`]. Clients add no
//! retries, validation or transformation: every operation returns or raises
//! exactly what the [`Pipeline`] returns or raises.

pub mod auth;
pub mod chatbot;
pub mod employees;
pub mod equipment;
pub mod locations;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::debug;

use crate::error::ClientError;
use crate::pipeline::{ApiRequest, Pipeline};

pub use auth::AuthService;
pub use chatbot::ChatbotClient;
pub use employees::{EmployeeClient, EmployeeResource};
pub use equipment::{EquipmentClient, EquipmentFilter, EquipmentResource};
pub use locations::{LocationClient, LocationResource};

/// Query parameters of a list call.
pub trait QueryParams {
    fn to_query(&self) -> Vec<(String, String)>;
}

/// Plain `skip`/`limit` paging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageFilter {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl QueryParams for PageFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(skip) = self.skip {
            params.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// Shape of a CRUD resource exposed by the backend.
pub trait Resource: Send + Sync + 'static {
    /// Collection path, e.g. `/equipment`.
    const PATH: &'static str;
    /// Singular name used in logs.
    const NAME: &'static str;

    type Record: DeserializeOwned + Send;
    type Draft: Serialize + Sync;
    type Patch: Serialize + Sync;
    type Filter: QueryParams + Sync;
}

pub struct ResourceClient<R: Resource> {
    pipeline: Pipeline,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self::new(self.pipeline.clone())
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            _resource: PhantomData,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", R::PATH, id)
    }

    pub async fn list(&self, filter: &R::Filter) -> Result<Vec<R::Record>, ClientError> {
        let request = ApiRequest::get(R::PATH).query(filter.to_query());
        let records: Vec<R::Record> = self.pipeline.send_json(request).await?;
        debug!(resource = R::NAME, count = records.len(), "Listed records");
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<R::Record, ClientError> {
        self.pipeline
            .send_json(ApiRequest::get(Self::item_path(id)))
            .await
    }

    pub async fn create(&self, draft: &R::Draft) -> Result<R::Record, ClientError> {
        let request = ApiRequest::post(R::PATH).json(draft)?;
        self.pipeline.send_json(request).await
    }

    pub async fn update(&self, id: i64, patch: &R::Patch) -> Result<R::Record, ClientError> {
        let request = ApiRequest::put(Self::item_path(id)).json(patch)?;
        self.pipeline.send_json(request).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.pipeline
            .send_empty(ApiRequest::delete(Self::item_path(id)))
            .await
    }
}

/// Every client, sharing one pipeline.
#[derive(Clone)]
pub struct ApiClients {
    pub auth: AuthService,
    pub equipment: EquipmentClient,
    pub employees: EmployeeClient,
    pub locations: LocationClient,
    pub chatbot: ChatbotClient,
}

impl ApiClients {
    pub fn new(pipeline: Pipeline, session: crate::session::SessionStore) -> Self {
        Self {
            auth: AuthService::new(pipeline.clone(), session),
            equipment: EquipmentClient::new(pipeline.clone()),
            employees: EmployeeClient::new(pipeline.clone()),
            locations: LocationClient::new(pipeline.clone()),
            chatbot: ChatbotClient::new(pipeline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_filter_query() {
        assert!(PageFilter::default().to_query().is_empty());
        let filter = PageFilter {
            skip: Some(20),
            limit: Some(10),
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("skip".to_string(), "20".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );
    }
}
