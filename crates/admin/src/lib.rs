//! Controller layer of the Casa de Apoio admin front-end.
//!
//! Sits between the screens and [`casa_client`]: paginated list controllers
//! with debounced search and stale-response protection, the attendance
//! create/edit forms, the class enrollment picker, the student forms and
//! registration flow, and the application context that holds the session.

pub mod attendance;
pub mod config;
pub mod context;
pub mod debounce;
pub mod enrollment;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod list;
pub mod notify;
pub mod student;
pub mod telemetry;
pub mod wizard;

pub use config::AdminConfig;
pub use context::AppContext;
pub use error::AdminError;
pub use notify::{Notifier, Toast, ToastLevel};
