//! The backend calls the attendance forms depend on.
//!
//! [`RosterGateway`] is implemented for [`ApiClient`]; tests substitute an
//! in-memory fake.

use async_trait::async_trait;

use casa_client::attendance::AttendanceSubmission;
use casa_client::query::ClassStudentsQuery;
use casa_client::{ApiClient, ApiError};
use casa_core::attendance::ClassSession;
use casa_core::pagination::ROSTER_FETCH_LIMIT;
use casa_core::student::StudentSummary;

#[async_trait]
pub trait RosterGateway: Send + Sync {
    /// Students enrolled in `class_id` whose name matches `search`, in one
    /// request of up to [`ROSTER_FETCH_LIMIT`] rows.
    async fn class_roster(
        &self,
        class_id: &str,
        search: &str,
    ) -> Result<Vec<StudentSummary>, ApiError>;

    async fn create_session(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<ClassSession, ApiError>;

    async fn update_session(
        &self,
        id: &str,
        submission: &AttendanceSubmission,
    ) -> Result<ClassSession, ApiError>;

    async fn fetch_session(&self, id: &str) -> Result<ClassSession, ApiError>;
}

#[async_trait]
impl RosterGateway for ApiClient {
    async fn class_roster(
        &self,
        class_id: &str,
        search: &str,
    ) -> Result<Vec<StudentSummary>, ApiError> {
        let query = ClassStudentsQuery::roster(class_id, ROSTER_FETCH_LIMIT, search);
        let page = self.list_class_students(&query).await?;
        Ok(page.data.into_iter().map(|m| m.student).collect())
    }

    async fn create_session(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<ClassSession, ApiError> {
        self.create_attendance(submission).await
    }

    async fn update_session(
        &self,
        id: &str,
        submission: &AttendanceSubmission,
    ) -> Result<ClassSession, ApiError> {
        self.update_attendance(id, submission).await
    }

    async fn fetch_session(&self, id: &str) -> Result<ClassSession, ApiError> {
        self.get_attendance(id).await
    }
}
