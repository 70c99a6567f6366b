//! REST client for the Casa de Apoio backend.
//!
//! [`ApiClient`](api::ApiClient) wraps a configured [`reqwest::Client`],
//! injects the bearer token from a [`TokenStore`](token::TokenStore) on
//! every request, and exposes one call per backend endpoint, grouped by
//! resource in the `auth`, `students`, `classes`, `users` and `attendance`
//! modules.

pub mod api;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod query;
pub mod students;
pub mod token;
pub mod users;

pub use api::{ApiClient, ApiError, ClientConfig};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
