use casa_client::ApiError;
use casa_core::error::CoreError;

/// Errors surfaced by the controller layer.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The request was superseded by a newer one before it resolved.
    #[error("Request cancelled")]
    Cancelled,
}

impl AdminError {
    /// Text for an error toast.
    ///
    /// Server messages and local validation messages are shown as-is;
    /// everything else gets the generic retry-later text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Core(CoreError::Validation(message)) => message.clone(),
            Self::Core(CoreError::InvalidForm(fields)) => fields
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| casa_client::api::GENERIC_ERROR_MESSAGE.to_string()),
            _ => casa_client::api::GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
