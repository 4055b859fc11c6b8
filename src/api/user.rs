//! User endpoint wrappers.
//!
//! The login exchange the credential store delegates to, plus the
//! current-user lookup. Everything else the backend offers is declared by
//! its own feature modules.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{AuthenticatedUser, Authenticator, Credentials};

use super::error::ApiError;
use super::gateway::ApiGateway;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// User-facing endpoints of the sync backend.
pub struct UserApi {
    gateway: Arc<ApiGateway>,
}

impl UserApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.gateway
            .post(
                "/auth/login",
                &json!({"username": username, "password": password}),
            )
            .await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.gateway.get("/users/me").await
    }
}

#[async_trait]
impl Authenticator for UserApi {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthenticatedUser, ApiError> {
        let response = self
            .login(&credentials.username, &credentials.password)
            .await?;
        Ok(AuthenticatedUser {
            token: response.token,
            user_id: response.user.id,
            username: response.user.username,
        })
    }
}
