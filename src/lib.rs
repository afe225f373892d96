//! SEO Console
//!
//! Typed client for the SEO analytics REST API: session handling, a cached
//! query layer, derived metrics and text views over projects, keywords,
//! rankings, competitors, backlinks and the AI assistant.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod navigation;
pub mod query;
pub mod storage;
pub mod views;

use std::sync::Arc;

use api::ApiClient;
use auth::{AuthStore, Session};
use config::Config;
use errors::ClientError;
use navigation::Navigator;
use query::QueryClient;
use storage::LocalStorage;

/// Process-wide client state shared by every view.
#[derive(Clone)]
pub struct App {
    pub config: Arc<Config>,
    pub storage: LocalStorage,
    pub client: ApiClient,
    pub queries: Arc<QueryClient>,
    pub session: Arc<Session>,
}

impl App {
    /// Open local storage and wire the client together. Does not touch the network.
    pub async fn open(config: Config) -> Result<Self, ClientError> {
        let pool = storage::init_storage(&config.state_path).await?;
        let storage = LocalStorage::new(pool);

        let auth = Arc::new(AuthStore::new(storage.clone()));
        let navigator = Arc::new(Navigator::new(auth.clone()));
        let client = ApiClient::new(&config.api_url, auth, navigator)?;
        let queries = Arc::new(QueryClient::new(config.query_stale_time));
        let session = Arc::new(Session::new(client.clone(), queries.clone()));

        Ok(Self {
            config: Arc::new(config),
            storage,
            client,
            queries,
            session,
        })
    }

    /// Open and restore the persisted session.
    pub async fn start(config: Config) -> Result<Self, ClientError> {
        let app = Self::open(config).await?;
        app.session.initialize().await?;
        Ok(app)
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        self.client.auth_store()
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        self.client.navigator()
    }
}

#[cfg(test)]
mod tests;
