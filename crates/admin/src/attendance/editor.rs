use std::sync::Arc;

use chrono::NaiveDate;

use casa_client::attendance::{AttendanceSubmission, PhotoUpload};
use casa_core::attendance::{validate_entries, ClassSession, PresenceEntry};
use casa_core::error::CoreError;
use casa_core::roster::PresenceBoard;
use casa_core::types::EntityId;
use casa_core::validation::IdFormat;

use super::{OnSaved, UPDATED_MESSAGE};
use crate::error::AdminError;
use crate::gateway::RosterGateway;
use crate::notify::Notifier;

/// What the photo area of the edit form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoState<'a> {
    /// The photo already stored for the session.
    Remote(&'a str),
    /// A newly picked file. Supersedes the remote photo.
    Local(&'a PhotoUpload),
    /// Nothing stored and nothing picked.
    Empty,
}

/// State of the "edit attendance" form.
///
/// [`load`](Self::load) always rebuilds from the fetched session; nothing
/// from a previously loaded session survives.
pub struct RosterEditor {
    gateway: Arc<dyn RosterGateway>,
    notifier: Notifier,
    id_format: IdFormat,
    class_id: EntityId,
    session_id: Option<EntityId>,
    date: Option<NaiveDate>,
    board: PresenceBoard,
    remote_photo: Option<String>,
    local_photo: Option<PhotoUpload>,
    on_saved: Option<OnSaved>,
}

impl RosterEditor {
    pub fn new(
        gateway: Arc<dyn RosterGateway>,
        notifier: Notifier,
        class_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            id_format: IdFormat::default(),
            class_id: class_id.into(),
            session_id: None,
            date: None,
            board: PresenceBoard::new(),
            remote_photo: None,
            local_photo: None,
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

    /// Discard local state and hydrate from session `id`.
    pub async fn load(&mut self, id: &str) -> Result<(), AdminError> {
        self.reset();
        match self.gateway.fetch_session(id).await {
            Ok(session) => {
                tracing::debug!(
                    session_id = %session.id,
                    rows = session.attendance_details.len(),
                    "Attendance session loaded",
                );
                self.hydrate(session);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(session_id = id, error = %e, "Failed to load attendance session");
                let err = AdminError::from(e);
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }

    fn reset(&mut self) {
        self.session_id = None;
        self.date = None;
        self.board.clear();
        self.remote_photo = None;
        self.local_photo = None;
    }

    fn hydrate(&mut self, session: ClassSession) {
        self.board = PresenceBoard::from_details(&session.attendance_details);
        self.date = Some(session.date);
        self.remote_photo = session.photo_url.filter(|url| !url.is_empty());
        if let Some(class_id) = session.class_id {
            self.class_id = class_id;
        }
        self.session_id = Some(session.id);
    }

    pub fn toggle_all(&mut self, is_present: bool) {
        self.board.toggle_all(is_present);
    }

    pub fn toggle_presence(&mut self, student_id: &str, is_present: bool) -> Result<(), AdminError> {
        Ok(self.board.toggle_presence(student_id, is_present)?)
    }

    pub fn set_observations(&mut self, student_id: &str, note: &str) -> Result<(), AdminError> {
        Ok(self.board.set_observations(student_id, note)?)
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    pub fn attach_photo(&mut self, photo: PhotoUpload) {
        self.local_photo = Some(photo);
    }

    /// Drop the newly picked file; the remote photo (if any) shows again.
    pub fn discard_local_photo(&mut self) {
        self.local_photo = None;
    }

    pub fn photo_state(&self) -> PhotoState<'_> {
        match (&self.local_photo, &self.remote_photo) {
            (Some(local), _) => PhotoState::Local(local),
            (None, Some(url)) => PhotoState::Remote(url),
            (None, None) => PhotoState::Empty,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn board(&self) -> &PresenceBoard {
        &self.board
    }

    pub fn entries(&self) -> &[PresenceEntry] {
        self.board.entries()
    }

    /// PUT the edited roster. The photo part is sent only when a new file
    /// was picked, so an unchanged form keeps the stored photo.
    pub async fn submit(&mut self) -> Result<ClassSession, AdminError> {
        match self.try_submit().await {
            Ok(session) => {
                tracing::info!(session_id = %session.id, "Attendance updated");
                self.notifier.success(UPDATED_MESSAGE);
                if let Some(callback) = &self.on_saved {
                    callback(&session);
                }
                Ok(session)
            }
            Err(err) => {
                tracing::warn!(session_id = ?self.session_id, error = %err, "Attendance update failed");
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }

    async fn try_submit(&self) -> Result<ClassSession, AdminError> {
        let id = self.session_id.as_deref().ok_or_else(|| {
            CoreError::Validation("Nenhuma chamada carregada para edição".to_string())
        })?;
        validate_entries(self.board.entries(), self.id_format)?;
        let submission = AttendanceSubmission {
            class_id: self.class_id.clone(),
            date: self.date,
            photo: self.local_photo.clone(),
            students: self.board.entries().to_vec(),
        };
        Ok(self.gateway.update_session(id, &submission).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::attendance::fake::FakeGateway;

    const ANA: &str = "6a1c2d3e-0000-4000-8000-000000000001";
    const BRUNO: &str = "6a1c2d3e-0000-4000-8000-000000000002";
    const CARLA: &str = "6a1c2d3e-0000-4000-8000-000000000003";

    fn setup() -> (Arc<FakeGateway>, RosterEditor) {
        let gateway = Arc::new(FakeGateway::default());
        gateway.add_session(
            "cs1",
            Some("https://cdn/cs1.jpg"),
            &[(ANA, "Ana", true), (BRUNO, "Bruno", false)],
        );
        gateway.add_session("cs2", None, &[(CARLA, "Carla", true)]);
        let editor = RosterEditor::new(gateway.clone(), Notifier::default(), "c1");
        (gateway, editor)
    }

    #[tokio::test]
    async fn load_hydrates_presence_and_photo() {
        let (_, mut editor) = setup();
        editor.load("cs1").await.unwrap();

        assert_eq!(editor.session_id(), Some("cs1"));
        assert_eq!(editor.board().is_present(ANA), Some(true));
        assert_eq!(editor.board().is_present(BRUNO), Some(false));
        assert_eq!(editor.photo_state(), PhotoState::Remote("https://cdn/cs1.jpg"));
        assert_eq!(editor.date(), NaiveDate::from_ymd_opt(2024, 5, 10));
    }

    #[tokio::test]
    async fn loading_another_session_discards_previous_state() {
        let (_, mut editor) = setup();
        editor.load("cs1").await.unwrap();
        editor.toggle_all(true);
        editor.attach_photo(PhotoUpload::new("n.png", "image/png", vec![1]).unwrap());

        editor.load("cs2").await.unwrap();
        assert_eq!(editor.entries().len(), 1);
        assert_eq!(editor.board().is_present(ANA), None);
        assert_eq!(editor.photo_state(), PhotoState::Empty);
    }

    #[tokio::test]
    async fn failed_load_leaves_empty_form() {
        let (_, mut editor) = setup();
        editor.load("cs1").await.unwrap();

        assert!(editor.load("missing").await.is_err());
        assert_eq!(editor.session_id(), None);
        assert!(editor.board().is_empty());
    }

    #[tokio::test]
    async fn unchanged_update_omits_photo() {
        let (gateway, mut editor) = setup();
        editor.load("cs1").await.unwrap();
        editor.submit().await.unwrap();

        let writes = gateway.writes();
        let (id, body) = &writes[0];
        assert_eq!(id.as_deref(), Some("cs1"));
        assert!(body.photo.is_none());
        assert_eq!(body.students.len(), 2);
        assert!(body.students[0].is_present);
    }

    #[tokio::test]
    async fn new_photo_supersedes_remote_and_is_sent() {
        let (gateway, mut editor) = setup();
        editor.load("cs1").await.unwrap();

        let photo = PhotoUpload::new("nova.jpg", "image/jpeg", vec![9, 9]).unwrap();
        editor.attach_photo(photo.clone());
        assert_eq!(editor.photo_state(), PhotoState::Local(&photo));

        editor.submit().await.unwrap();
        assert_eq!(gateway.writes()[0].1.photo.as_ref(), Some(&photo));

        editor.discard_local_photo();
        assert_eq!(editor.photo_state(), PhotoState::Remote("https://cdn/cs1.jpg"));
    }

    #[tokio::test]
    async fn submit_without_loaded_session_is_rejected() {
        let (gateway, mut editor) = setup();
        assert_matches!(
            editor.submit().await,
            Err(AdminError::Core(CoreError::Validation(_)))
        );
        assert!(gateway.writes().is_empty());
    }
}
