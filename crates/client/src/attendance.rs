//! Attendance (class session) endpoints and their multipart encoding.
//!
//! Create and update share one body shape:
//!
//! | Field      | Kind   | Notes                                         |
//! |------------|--------|-----------------------------------------------|
//! | `classId`  | text   | always sent                                   |
//! | `date`     | text   | `YYYY-MM-DD`, sent when known                 |
//! | `photo`    | binary | only when a new image was picked              |
//! | `students` | text   | compact JSON array of presence entries        |
//!
//! Leaving `photo` out on update keeps the photo already stored server-side.

use std::path::Path;

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use casa_core::attendance::{encode_entries, ClassSession, PresenceEntry};
use casa_core::error::CoreError;
use casa_core::pagination::Page;
use casa_core::types::EntityId;
use casa_core::validation::is_image_mime;

use crate::api::{ApiClient, ApiError};
use crate::query::AttendanceListQuery;

// ---------------------------------------------------------------------------
// Photo uploads
// ---------------------------------------------------------------------------

/// An image picked by the user, held in memory until submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Accepts only image MIME types. Contents are not inspected.
    pub fn new(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let mime = mime.into();
        if !is_image_mime(&mime) {
            return Err(CoreError::Validation(format!(
                "Only image files can be attached (got '{mime}')"
            )));
        }
        Ok(Self {
            file_name: file_name.into(),
            mime,
            bytes,
        })
    }

    /// Read a file from disk, deriving the MIME type from its extension.
    pub async fn from_path(path: &Path) -> Result<Self, CoreError> {
        let mime = mime_for_path(path).ok_or_else(|| {
            CoreError::Validation(format!(
                "'{}' is not a supported image file",
                path.display()
            ))
        })?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Self::new(file_name, mime, bytes)
    }
}

/// Image MIME type for a file extension, mirroring an `accept="image/*"` picker.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Submission body
// ---------------------------------------------------------------------------

/// Everything needed to create or update a class session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSubmission {
    pub class_id: EntityId,
    pub date: Option<NaiveDate>,
    /// A newly picked photo. `None` leaves the stored photo untouched.
    pub photo: Option<PhotoUpload>,
    pub students: Vec<PresenceEntry>,
}

impl AttendanceSubmission {
    /// Build the multipart body. A fresh form is built per request because
    /// `reqwest` consumes it on send.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let students = encode_entries(&self.students).map_err(|e| ApiError::Encode(e.to_string()))?;

        let mut form = Form::new().text("classId", self.class_id.clone());
        if let Some(date) = self.date {
            form = form.text("date", date.format("%Y-%m-%d").to_string());
        }
        if let Some(photo) = &self.photo {
            let part = Part::bytes(photo.bytes.clone())
                .file_name(photo.file_name.clone())
                .mime_str(&photo.mime)?;
            form = form.part("photo", part);
        }
        Ok(form.text("students", students))
    }
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

impl ApiClient {
    /// `POST /class-attendance` (multipart).
    pub async fn create_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<ClassSession, ApiError> {
        let builder = self
            .request(Method::POST, "/class-attendance")?
            .multipart(submission.to_form()?);
        let session: ClassSession = Self::send_json(builder).await?;
        tracing::info!(
            session_id = %session.id,
            class_id = %submission.class_id,
            students = submission.students.len(),
            with_photo = submission.photo.is_some(),
            "Attendance created",
        );
        Ok(session)
    }

    /// `PUT /class-attendance/:id` (multipart).
    pub async fn update_attendance(
        &self,
        id: &str,
        submission: &AttendanceSubmission,
    ) -> Result<ClassSession, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/class-attendance/{id}"))?
            .multipart(submission.to_form()?);
        let session: ClassSession = Self::send_json(builder).await?;
        tracing::info!(
            session_id = %id,
            students = submission.students.len(),
            with_photo = submission.photo.is_some(),
            "Attendance updated",
        );
        Ok(session)
    }

    /// `GET /class-attendance/range?id=` with per-student details.
    pub async fn get_attendance(&self, id: &str) -> Result<ClassSession, ApiError> {
        let builder = self
            .request(Method::GET, "/class-attendance/range")?
            .query(&[("id", id)]);
        Self::send_json(builder).await
    }

    /// `GET /class-attendance?classId&skip&take`
    pub async fn list_attendance(
        &self,
        query: &AttendanceListQuery,
    ) -> Result<Page<ClassSession>, ApiError> {
        let builder = self.request(Method::GET, "/class-attendance")?.query(query);
        Self::send_json(builder).await
    }
}
