use std::sync::Arc;

use chrono::NaiveDate;

use casa_client::attendance::{AttendanceSubmission, PhotoUpload};
use casa_core::attendance::{validate_entries, ClassSession, PresenceEntry};
use casa_core::roster::PresenceBoard;
use casa_core::types::EntityId;
use casa_core::validation::IdFormat;

use super::{OnSaved, CREATED_MESSAGE};
use crate::error::AdminError;
use crate::gateway::RosterGateway;
use crate::notify::Notifier;

/// State of the "new attendance" form for one class and date.
///
/// Failures are reported as error toasts and leave every edit in place so
/// the user can retry.
pub struct RosterBuilder {
    gateway: Arc<dyn RosterGateway>,
    notifier: Notifier,
    id_format: IdFormat,
    class_id: EntityId,
    date: NaiveDate,
    search: String,
    board: PresenceBoard,
    photo: Option<PhotoUpload>,
    open: bool,
    on_saved: Option<OnSaved>,
}

impl RosterBuilder {
    pub fn new(
        gateway: Arc<dyn RosterGateway>,
        notifier: Notifier,
        class_id: impl Into<EntityId>,
        date: NaiveDate,
    ) -> Self {
        Self {
            gateway,
            notifier,
            id_format: IdFormat::default(),
            class_id: class_id.into(),
            date,
            search: String::new(),
            board: PresenceBoard::new(),
            photo: None,
            open: true,
            on_saved: None,
        }
    }

    pub fn with_id_format(mut self, id_format: IdFormat) -> Self {
        self.id_format = id_format;
        self
    }

    pub fn on_saved<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ClassSession) + Send + Sync + 'static,
    {
        self.on_saved = Some(Box::new(callback));
        self
    }

    /// Fetch the class roster filtered by `search` and merge it into the
    /// board. Switching to another class starts from a clean board.
    pub async fn load_roster(&mut self, class_id: &str, search: &str) -> Result<(), AdminError> {
        if class_id != self.class_id {
            self.board.clear();
            self.class_id = class_id.to_string();
        }
        match self.gateway.class_roster(class_id, search).await {
            Ok(students) => {
                tracing::debug!(class_id, students = students.len(), "Roster loaded");
                self.search = search.to_string();
                self.board.load(students);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(class_id, error = %e, "Failed to load class roster");
                let err = AdminError::from(e);
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }

    /// Mark every visible student present or absent.
    pub fn toggle_all(&mut self, is_present: bool) {
        self.board.toggle_all(is_present);
    }

    pub fn toggle_presence(&mut self, student_id: &str, is_present: bool) -> Result<(), AdminError> {
        Ok(self.board.toggle_presence(student_id, is_present)?)
    }

    pub fn set_observations(&mut self, student_id: &str, note: &str) -> Result<(), AdminError> {
        Ok(self.board.set_observations(student_id, note)?)
    }

    /// Replace the attached photo. Only image MIME types reach this point.
    pub fn attach_photo(&mut self, photo: PhotoUpload) {
        self.photo = Some(photo);
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn board(&self) -> &PresenceBoard {
        &self.board
    }

    pub fn entries(&self) -> &[PresenceEntry] {
        self.board.entries()
    }

    pub fn photo(&self) -> Option<&PhotoUpload> {
        self.photo.as_ref()
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// `false` once a submission succeeded and the form should close.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Validate and POST the roster.
    pub async fn submit(&mut self) -> Result<ClassSession, AdminError> {
        match self.try_submit().await {
            Ok(session) => {
                tracing::info!(
                    session_id = %session.id,
                    class_id = %self.class_id,
                    present = self.board.present_count(),
                    "Attendance submitted",
                );
                self.open = false;
                self.notifier.success(CREATED_MESSAGE);
                if let Some(callback) = &self.on_saved {
                    callback(&session);
                }
                Ok(session)
            }
            Err(err) => {
                tracing::warn!(class_id = %self.class_id, error = %err, "Attendance submit failed");
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }

    async fn try_submit(&self) -> Result<ClassSession, AdminError> {
        validate_entries(self.board.entries(), self.id_format)?;
        let submission = AttendanceSubmission {
            class_id: self.class_id.clone(),
            date: Some(self.date),
            photo: self.photo.clone(),
            students: self.board.entries().to_vec(),
        };
        Ok(self.gateway.create_session(&submission).await?)
    }
}
