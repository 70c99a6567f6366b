//! Shared validation helpers for form submission.
//!
//! Field-level rules live on the form structs as `validator` derives;
//! this module holds the rules that need runtime context (id format
//! policy) or are reused across forms.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Id format policy
// ---------------------------------------------------------------------------

/// How strictly entity ids are checked before a submission leaves the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdFormat {
    /// Ids must parse as a hyphenated UUID.
    #[default]
    Uuid,
    /// Any non-blank string is accepted.
    Opaque,
}

impl IdFormat {
    /// Check a single id against this policy.
    pub fn accepts(self, id: &str) -> bool {
        match self {
            Self::Uuid => is_uuid_shaped(id),
            Self::Opaque => !id.trim().is_empty(),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Uuid => "a UUID",
            Self::Opaque => "a non-empty identifier",
        }
    }
}

/// Returns `true` for the canonical 36-character hyphenated UUID form.
pub fn is_uuid_shaped(id: &str) -> bool {
    id.len() == 36 && uuid::Uuid::parse_str(id).is_ok()
}

// ---------------------------------------------------------------------------
// Upload constraints
// ---------------------------------------------------------------------------

/// MIME prefix accepted for attendance photos and avatars.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Whether a declared MIME type is an image type.
///
/// Only the declared type is checked; file contents are not sniffed.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with(IMAGE_MIME_PREFIX)
}

// ---------------------------------------------------------------------------
// Form helpers
// ---------------------------------------------------------------------------

/// Run the derived validation rules of a form, mapping failures to
/// [`CoreError::InvalidForm`] so callers can render inline messages.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), CoreError> {
    form.validate().map_err(CoreError::from)
}

/// Custom `validator` rule: a Brazilian CPF written as 11 digits,
/// optionally punctuated (`000.000.000-00`).
pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    let only_allowed = value.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if !only_allowed || digits.len() != 11 {
        let mut err = ValidationError::new("cpf");
        err.message = Some("CPF deve conter 11 dígitos".into());
        return Err(err);
    }
    Ok(())
}

/// Custom `validator` rule: rejects strings that are only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Campo obrigatório".into());
        return Err(err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
