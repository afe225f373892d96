//! REST API client.
//!
//! One `ApiClient` is shared by the whole app. Every request passes through
//! [`ApiClient::request`], which attaches the bearer token, and every
//! response through [`ApiClient::send`], which turns a 401 into a global
//! sign-out. Endpoint groups are thin borrowed views over the client, one
//! function per backend route.

mod ai;
mod auth;
mod backlinks;
mod competitors;
mod credentials;
mod keywords;
mod projects;
mod rank_tracking;
mod webhooks;

pub use ai::*;
pub use auth::*;
pub use backlinks::*;
pub use competitors::*;
pub use credentials::*;
pub use keywords::*;
pub use projects::*;
pub use rank_tracking::*;
pub use webhooks::*;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::AuthStore;
use crate::errors::ClientError;
use crate::navigation::Navigator;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<AuthStore>,
    navigator: Arc<Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        auth: Arc<AuthStore>,
        navigator: Arc<Navigator>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_store(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// Start a request against `path`, attaching the session token when there is one.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_with_token(method, path, self.auth.token().as_deref())
    }

    /// Start a request carrying `token` instead of the stored one.
    pub(crate) fn request_with_token(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and map non-success statuses to errors.
    ///
    /// A 401 clears the stored session and forces the navigator to `/login`
    /// before the error is returned.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Received 401 from backend, signing out");
            if let Err(e) = self.auth.clear_auth().await {
                tracing::warn!("Failed to clear persisted session: {}", e);
            }
            self.navigator.redirect_to_login();
        } else {
            tracing::debug!("Request failed with {}: {}", status, body);
        }

        Err(ClientError::from_status(status, &body))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        self.send(builder).await?;
        Ok(())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_json(self.request(Method::GET, path)).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::PUT, path).json(body))
            .await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, path)).await
    }
}
