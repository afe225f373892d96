//! Auth endpoints.

use reqwest::Method;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{RegisterRequest, TokenResponse, User};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// POST /api/auth/register - Create an account.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post_json("/api/auth/register", &body).await
    }

    /// POST /api/auth/login - Exchange credentials for a token (form-encoded).
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let builder = self
            .client
            .request(Method::POST, "/api/auth/login")
            .form(&[("username", email), ("password", password)]);
        self.client.send_json(builder).await
    }

    /// GET /api/auth/me - The user behind the current token.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.client.get_json("/api/auth/me").await
    }

    /// GET /api/auth/me with an explicit token, used before the token is stored.
    pub async fn me_with_token(&self, token: &str) -> Result<User, ClientError> {
        let builder = self
            .client
            .request_with_token(Method::GET, "/api/auth/me", Some(token));
        self.client.send_json(builder).await
    }

    /// POST /api/auth/refresh - Issue a fresh token for the current session.
    pub async fn refresh(&self) -> Result<TokenResponse, ClientError> {
        self.client
            .send_json(self.client.request(Method::POST, "/api/auth/refresh"))
            .await
    }
}
