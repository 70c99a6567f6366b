//! "Add students to class" picker.

use casa_client::query::{ClassStudentsQuery, ListQuery};
use casa_client::ApiClient;
use casa_core::class::EnrollStudents;
use casa_core::enrollment::{available_for_selection, EnrollmentSelection};
use casa_core::error::CoreError;
use casa_core::pagination::{PageRequest, ROSTER_FETCH_LIMIT};
use casa_core::sorting::SortOrder;
use casa_core::student::StudentSummary;
use casa_core::types::EntityId;

use crate::error::AdminError;
use crate::notify::Notifier;

pub const ENROLLED_MESSAGE: &str = "Alunos adicionados à oficina com sucesso!";

/// Lists students not yet in the class, tracks the ticked ones and submits
/// only ids that are still unenrolled.
pub struct EnrollmentSelector {
    client: ApiClient,
    notifier: Notifier,
    class_id: EntityId,
    candidates: Vec<StudentSummary>,
    selection: EnrollmentSelection,
}

impl EnrollmentSelector {
    pub fn new(client: ApiClient, notifier: Notifier, class_id: impl Into<EntityId>) -> Self {
        Self {
            client,
            notifier,
            class_id: class_id.into(),
            candidates: Vec::new(),
            selection: EnrollmentSelection::default(),
        }
    }

    /// Fetch the current members of the class and the candidate students
    /// matching `search`.
    pub async fn load(&mut self, search: &str) -> Result<(), AdminError> {
        let members = self
            .client
            .list_class_students(&ClassStudentsQuery::roster(
                self.class_id.clone(),
                ROSTER_FETCH_LIMIT,
                "",
            ))
            .await;
        let students = self
            .client
            .list_students(&ListQuery::new(
                &PageRequest::first(ROSTER_FETCH_LIMIT),
                search,
                Some(SortOrder::Asc),
            ))
            .await;

        match (members, students) {
            (Ok(members), Ok(students)) => {
                self.selection
                    .set_enrolled(members.data.iter().map(|m| m.student_id().to_string()));
                self.candidates = students.data.iter().map(|s| s.summary()).collect();
                tracing::debug!(
                    class_id = %self.class_id,
                    enrolled = self.selection.enrolled_count(),
                    candidates = self.candidates.len(),
                    "Enrollment picker loaded",
                );
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(class_id = %self.class_id, error = %e, "Failed to load enrollment picker");
                let err = AdminError::from(e);
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }

    /// Candidates that are not enrolled yet, in server order.
    pub fn available(&self) -> Vec<StudentSummary> {
        available_for_selection(&self.candidates, self.selection.enrolled())
    }

    /// Flip one student's tick. Enrolled students cannot be ticked.
    pub fn toggle(&mut self, student_id: &str) -> bool {
        self.selection.toggle(student_id)
    }

    pub fn is_selected(&self, student_id: &str) -> bool {
        self.selection.is_selected(student_id)
    }

    pub fn pending(&self) -> Vec<EntityId> {
        self.selection.pending()
    }

    /// POST the ticked students. Returns how many were enrolled.
    pub async fn submit(&mut self) -> Result<usize, AdminError> {
        let student_ids = self.selection.pending();
        if student_ids.is_empty() {
            let err = AdminError::from(CoreError::Validation(
                "Selecione ao menos um aluno".to_string(),
            ));
            self.notifier.error(err.user_message());
            return Err(err);
        }

        let body = EnrollStudents {
            class_id: self.class_id.clone(),
            student_ids,
        };
        match self.client.enroll_students(&body).await {
            Ok(()) => {
                let count = body.student_ids.len();
                self.selection.commit();
                tracing::info!(class_id = %self.class_id, count, "Students enrolled");
                self.notifier.success(ENROLLED_MESSAGE);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(class_id = %self.class_id, error = %e, "Enrollment failed");
                let err = AdminError::from(e);
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }
}
