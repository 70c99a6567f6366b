//! Staff user endpoints.

use reqwest::Method;

use casa_core::pagination::Page;
use casa_core::user::{User, UserForm};

use crate::api::{ApiClient, ApiError};
use crate::query::ListQuery;

impl ApiClient {
    /// `GET /users?skip&take&name&orderBy`
    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<User>, ApiError> {
        let builder = self.request(Method::GET, "/users")?.query(query);
        Self::send_json(builder).await
    }

    /// `GET /users/:id`
    pub async fn get_user(&self, id: &str) -> Result<User, ApiError> {
        let builder = self.request(Method::GET, &format!("/users/{id}"))?;
        Self::send_json(builder).await
    }

    /// `POST /users`
    pub async fn create_user(&self, form: &UserForm) -> Result<User, ApiError> {
        let builder = self.request(Method::POST, "/users")?.json(form);
        Self::send_json(builder).await
    }

    /// `PUT /users/:id`
    pub async fn update_user(&self, id: &str, form: &UserForm) -> Result<User, ApiError> {
        let builder = self.request(Method::PUT, &format!("/users/{id}"))?.json(form);
        Self::send_json(builder).await
    }

    /// `DELETE /users/:id`
    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/users/{id}"))?;
        Self::send_empty(builder).await
    }
}
