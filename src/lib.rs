pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod router;
pub mod session;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use api::ApiClients;
use config::Config;
use error::ClientError;
use pipeline::Pipeline;
use router::{Navigator, Route, Router};
use session::{FileStore, KeyValueStore, SessionStore};

/// Everything a console session needs, wired once at startup.
pub struct Console {
    pub config: Config,
    session: SessionStore,
    router: Router,
    clients: ApiClients,
}

impl Console {
    /// Open the console with the session persisted under `session.state_dir`.
    pub fn open(config: Config) -> Result<Self, ClientError> {
        let storage = Arc::new(FileStore::new(&config.session.state_dir));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(
        config: Config,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ClientError> {
        let navigator = Navigator::new(Route::Login);
        let session = SessionStore::open(storage, navigator);
        let pipeline = Pipeline::standard(&config.api, session.clone())?;
        let clients = ApiClients::new(pipeline, session.clone());
        let router = Router::new(session.clone());

        Ok(Self {
            config,
            session,
            router,
            clients,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn clients(&self) -> &ApiClients {
        &self.clients
    }
}
