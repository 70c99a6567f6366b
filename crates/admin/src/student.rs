//! Student forms: the "Dados do Aluno" step and the status dialog.
//!
//! Validation failures come back as [`AdminError::Core`] for inline display
//! and produce no toast. Backend failures produce an error toast.

use casa_client::{ApiClient, ApiError};
use casa_core::student::{Student, StudentDataForm, StudentStatusUpdate};
use casa_core::validation::validate_form;

use crate::error::AdminError;
use crate::notify::Notifier;

pub const DATA_SAVED_MESSAGE: &str = "Dados do aluno salvos com sucesso!";
pub const STATUS_SAVED_MESSAGE: &str = "Status do aluno atualizado!";

#[derive(Debug, Clone)]
pub struct StudentForms {
    client: ApiClient,
    notifier: Notifier,
}

impl StudentForms {
    pub fn new(client: ApiClient, notifier: Notifier) -> Self {
        Self { client, notifier }
    }

    /// Create the student (`id == None`) or update an existing one.
    pub async fn save_data(
        &self,
        id: Option<&str>,
        form: &StudentDataForm,
    ) -> Result<Student, AdminError> {
        validate_form(form)?;
        let result = match id {
            Some(id) => self.client.update_student(id, form).await,
            None => self.client.create_student(form).await,
        };
        let student = self.report(result, DATA_SAVED_MESSAGE)?;
        tracing::info!(student_id = %student.id, created = id.is_none(), "Student data saved");
        Ok(student)
    }

    pub async fn change_status(
        &self,
        id: &str,
        update: &StudentStatusUpdate,
    ) -> Result<Student, AdminError> {
        update.validate()?;
        let result = self.client.update_student_status(id, update).await;
        let student = self.report(result, STATUS_SAVED_MESSAGE)?;
        tracing::info!(student_id = id, status = ?update.status, "Student status changed");
        Ok(student)
    }

    fn report(&self, result: Result<Student, ApiError>, success: &str) -> Result<Student, AdminError> {
        match result {
            Ok(student) => {
                self.notifier.success(success);
                Ok(student)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Student form submit failed");
                let err = AdminError::from(e);
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }
}
