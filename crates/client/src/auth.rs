//! Authentication endpoints.

use reqwest::Method;
use serde::Deserialize;

use casa_core::user::{LoginForm, User};

use crate::api::{ApiClient, ApiError};

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub user: User,
}

impl ApiClient {
    /// `POST /auth/login` and persist the returned token.
    pub async fn login(&self, form: &LoginForm) -> Result<LoginResponse, ApiError> {
        let builder = self.request(Method::POST, "/auth/login")?.json(form);
        let response: LoginResponse = Self::send_json(builder).await?;
        self.tokens().save(&response.token)?;
        tracing::info!(user_id = %response.user.id, "Logged in");
        Ok(response)
    }

    /// `GET /auth/me` for the user owning the stored token.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let builder = self.request(Method::GET, "/auth/me")?;
        Self::send_json(builder).await
    }

    /// Forget the stored token. Purely local; there is no logout endpoint.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.tokens().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }
}
