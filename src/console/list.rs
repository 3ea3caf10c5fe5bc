use tracing::{debug, info, warn};

use super::validation::Validate;
use crate::api::{Resource, ResourceClient};
use crate::error::ClientError;
use crate::router::ViewScope;

/// Cached records of one resource plus the banner shown above them.
pub struct ListView<R: Resource> {
    client: ResourceClient<R>,
    scope: ViewScope,
    records: Vec<R::Record>,
    error: Option<String>,
}

impl<R: Resource> ListView<R> {
    pub fn new(client: ResourceClient<R>, scope: ViewScope) -> Self {
        Self {
            client,
            scope,
            records: Vec::new(),
            error: None,
        }
    }

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    /// Message of the last failed operation, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Replace the cached records with a fresh listing.
    pub async fn load(&mut self, filter: &R::Filter) -> Result<(), ClientError> {
        let result = self.scope.run(self.client.list(filter)).await;
        let records = self.settle(result)?;
        debug!(resource = R::NAME, count = records.len(), "List loaded");
        self.records = records;
        Ok(())
    }

    /// Delete a record after asking `confirm`.
    ///
    /// A declined confirmation is not an error: nothing is sent and `Ok(false)` is
    /// returned.
    pub async fn remove<F>(&mut self, id: i64, confirm: F) -> Result<bool, ClientError>
    where
        F: FnOnce(i64) -> bool,
    {
        if !confirm(id) {
            debug!(resource = R::NAME, id, "Delete declined");
            return Ok(false);
        }

        let result = self.scope.run(self.client.delete(id)).await;
        self.settle(result)?;
        info!(resource = R::NAME, id, "Record deleted");
        Ok(true)
    }

    /// [`Self::remove`], then reload the listing.
    ///
    /// The outcome reflects the delete alone. A failed reload only sets the banner and
    /// keeps the previous records.
    pub async fn delete<F>(
        &mut self,
        id: i64,
        filter: &R::Filter,
        confirm: F,
    ) -> Result<bool, ClientError>
    where
        F: FnOnce(i64) -> bool,
    {
        if !self.remove(id, confirm).await? {
            return Ok(false);
        }
        if let Err(e) = self.load(filter).await {
            warn!(resource = R::NAME, error = %e, "Reload after delete failed");
        }
        Ok(true)
    }

    /// Validate and create a record, then reload. As with [`Self::delete`], a failed
    /// reload only sets the banner.
    pub async fn create(
        &mut self,
        draft: &R::Draft,
        filter: &R::Filter,
    ) -> Result<R::Record, ClientError>
    where
        R::Draft: Validate,
    {
        if let Err(e) = draft.validate() {
            self.error = Some(e.message());
            return Err(e);
        }

        let result = self.scope.run(self.client.create(draft)).await;
        let record = self.settle(result)?;
        info!(resource = R::NAME, "Record created");

        if let Err(e) = self.load(filter).await {
            warn!(resource = R::NAME, error = %e, "Reload after create failed");
        }
        Ok(record)
    }

    /// Apply an outcome to the banner. Cancelled results leave the view untouched.
    fn settle<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match result {
            Ok(value) => {
                self.error = None;
                Ok(value)
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                self.error = Some(e.message());
                Err(e)
            }
        }
    }
}
