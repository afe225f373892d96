//! Session lifecycle over the API client: initialize, sign in/up/out, refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::User;
use crate::navigation::{Navigator, Route};
use crate::query::QueryClient;

use super::AuthStore;

pub struct Session {
    client: ApiClient,
    queries: Arc<QueryClient>,
    initialized: AtomicBool,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    pub fn new(client: ApiClient, queries: Arc<QueryClient>) -> Self {
        Self {
            client,
            queries,
            initialized: AtomicBool::new(false),
            watcher: Mutex::new(None),
        }
    }

    fn store(&self) -> &Arc<AuthStore> {
        self.client.auth_store()
    }

    fn navigator(&self) -> &Arc<Navigator> {
        self.client.navigator()
    }

    /// Restore the persisted session and start watching for sign-outs.
    ///
    /// Runs once; later calls return immediately. A stored token is checked
    /// against `/api/auth/me`; a rejected token is cleared by the 401 path,
    /// any other failure keeps the stored session.
    pub async fn initialize(&self) -> Result<(), ClientError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let store = self.store();
        store.hydrate().await?;

        if store.is_authenticated() {
            store.set_loading(true);
            let result = self.client.auth().me().await;
            store.set_loading(false);

            match result {
                Ok(user) => store.update_user(user).await?,
                Err(e) if e.is_unauthorized() => {
                    tracing::info!("Stored session expired");
                }
                Err(e) => {
                    tracing::warn!("Could not validate stored session: {}", e);
                }
            }
        }

        self.spawn_watcher();
        Ok(())
    }

    fn spawn_watcher(&self) {
        let mut rx = self.store().subscribe();
        let queries = self.queries.clone();
        let navigator = self.navigator().clone();

        let handle = tokio::spawn(async move {
            let mut had_token = rx.borrow_and_update().is_authenticated();
            while rx.changed().await.is_ok() {
                let has_token = rx.borrow_and_update().is_authenticated();
                if had_token && !has_token {
                    queries.clear();
                    if navigator.current().is_protected() {
                        navigator.redirect_to_login();
                    }
                }
                had_token = has_token;
            }
            tracing::debug!("Session watcher stopped");
        });

        let mut watcher = self
            .watcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = watcher.replace(handle) {
            previous.abort();
        }
    }

    /// Stop the session watcher.
    pub fn teardown(&self) {
        let handle = self
            .watcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Log in, load the user, store both, and land on the dashboard.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let token = self.client.auth().login(email, password).await?;

        // `me` needs the new token on the request.
        let user = self
            .client
            .auth()
            .me_with_token(&token.access_token)
            .await?;

        self.store()
            .set_auth(token.access_token, user.clone())
            .await?;
        self.navigator().navigate(Route::Dashboard);
        Ok(user)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, ClientError> {
        self.client.auth().register(email, password).await?;
        tracing::info!("Registered {}", email);
        self.sign_in(email, password).await
    }

    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.store().clear_auth().await?;
        self.queries.clear();
        self.navigator().navigate(Route::Login);
        Ok(())
    }

    /// Swap the stored token for a fresh one.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let token = self.client.auth().refresh().await?;
        let user = match self.store().user() {
            Some(user) => user,
            None => self.client.auth().me_with_token(&token.access_token).await?,
        };
        self.store().set_auth(token.access_token, user).await?;
        tracing::info!("Session token refreshed");
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.store().user()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}
