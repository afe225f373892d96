//! Session state for the signed-in user.
//!
//! `AuthStore` is the single writer of `{token, user, loading}`. Every change
//! is broadcast over a watch channel and the `{token, user}` pair is written
//! to local storage so a restart picks the session back up.

mod session;

pub use session::*;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::errors::ClientError;
use crate::models::User;
use crate::storage::LocalStorage;

/// Local storage key holding the persisted session.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Version stamped on the persisted entry.
const AUTH_STORAGE_VERSION: u32 = 0;

/// Current session as seen by the rest of the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// On-disk layout: `{"state": {"token": ..., "user": ...}, "version": 0}`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedAuth {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

pub struct AuthStore {
    state: watch::Sender<AuthState>,
    storage: LocalStorage,
}

impl AuthStore {
    pub fn new(storage: LocalStorage) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { state, storage }
    }

    /// Load the persisted session, if any. Leaves `loading` untouched.
    pub async fn hydrate(&self) -> Result<(), ClientError> {
        let persisted: Option<PersistedAuth> = self.storage.get_json(AUTH_STORAGE_KEY).await?;
        let Some(persisted) = persisted else {
            tracing::debug!("No persisted session");
            return Ok(());
        };

        if persisted.version != AUTH_STORAGE_VERSION {
            tracing::warn!(
                "Ignoring persisted session with unknown version {}",
                persisted.version
            );
            return Ok(());
        }

        let PersistedState { token, user } = persisted.state;
        tracing::debug!(has_token = token.is_some(), "Hydrated persisted session");
        self.state.send_modify(|s| {
            s.token = token;
            s.user = user;
        });
        Ok(())
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub async fn set_auth(&self, token: String, user: User) -> Result<(), ClientError> {
        tracing::info!("Signed in as {}", user.email);
        self.state.send_modify(|s| {
            s.token = Some(token);
            s.user = Some(user);
        });
        self.persist().await
    }

    /// Drop the session. A no-op write when already signed out.
    pub async fn clear_auth(&self) -> Result<(), ClientError> {
        let had_session = self.state.send_if_modified(|s| {
            let changed = s.token.is_some() || s.user.is_some();
            s.token = None;
            s.user = None;
            changed
        });
        if had_session {
            tracing::info!("Session cleared");
        }
        self.persist().await
    }

    pub async fn update_user(&self, user: User) -> Result<(), ClientError> {
        self.state.send_modify(|s| s.user = Some(user));
        self.persist().await
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }

    async fn persist(&self) -> Result<(), ClientError> {
        let entry = {
            let s = self.state.borrow();
            PersistedAuth {
                state: PersistedState {
                    token: s.token.clone(),
                    user: s.user.clone(),
                },
                version: AUTH_STORAGE_VERSION,
            }
        };
        self.storage.set_json(AUTH_STORAGE_KEY, &entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::init_storage;
    use tempfile::TempDir;

    fn sample_user() -> User {
        User {
            id: "user-1".to_string(),
            email: "owner@example.com".to_string(),
            api_credits_remaining: 10.0,
            created_at: None,
        }
    }

    async fn open_store(dir: &TempDir) -> AuthStore {
        let pool = init_storage(&dir.path().join("state.sqlite")).await.unwrap();
        AuthStore::new(LocalStorage::new(pool))
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir).await;
            store
                .set_auth("tok-123".to_string(), sample_user())
                .await
                .unwrap();
        }

        let store = open_store(&dir).await;
        assert!(!store.is_authenticated());
        store.hydrate().await.unwrap();
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert_eq!(store.user().unwrap().email, "owner@example.com");
    }

    #[tokio::test]
    async fn test_persisted_layout() {
        let dir = TempDir::new().unwrap();
        let pool = init_storage(&dir.path().join("state.sqlite")).await.unwrap();
        let storage = LocalStorage::new(pool);
        let store = AuthStore::new(storage.clone());
        store
            .set_auth("tok-abc".to_string(), sample_user())
            .await
            .unwrap();

        let raw: serde_json::Value = storage.get_json(AUTH_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(raw["version"], 0);
        assert_eq!(raw["state"]["token"], "tok-abc");
        assert_eq!(raw["state"]["user"]["id"], "user-1");
    }

    #[tokio::test]
    async fn test_clear_notifies_subscribers() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .set_auth("tok".to_string(), sample_user())
            .await
            .unwrap();

        let mut rx = store.subscribe();
        rx.borrow_and_update();
        store.clear_auth().await.unwrap();

        rx.changed().await.unwrap();
        assert!(!rx.borrow().is_authenticated());

        store.hydrate().await.unwrap();
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn test_update_user_keeps_token() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .set_auth("tok".to_string(), sample_user())
            .await
            .unwrap();

        let mut user = sample_user();
        user.api_credits_remaining = 3.5;
        store.update_user(user).await.unwrap();

        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user().unwrap().api_credits_remaining, 3.5);
    }
}
