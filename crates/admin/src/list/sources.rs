//! [`ListSource`] implementations for each list screen.

use async_trait::async_trait;

use casa_client::query::{AttendanceListQuery, ClassStudentsQuery, ListQuery};
use casa_client::{ApiClient, ApiError};
use casa_core::attendance::ClassSession;
use casa_core::class::{ClassInfo, ClassRosterMembership};
use casa_core::pagination::{
    Page, PageRequest, CLASS_ATTENDANCE_PAGE_SIZE, CLASS_PAGE_SIZE, CLASS_STUDENTS_PAGE_SIZE,
    STUDENT_PAGE_SIZE, USER_PAGE_SIZE,
};
use casa_core::sorting::SortOrder;
use casa_core::student::Student;
use casa_core::types::EntityId;
use casa_core::user::User;

use super::{ListController, ListSource};
use crate::error::AdminError;
use crate::notify::Notifier;

pub const REMOVED_MESSAGE: &str = "Aluno removido da oficina com sucesso!";

#[derive(Debug, Clone)]
pub struct StudentSource {
    client: ApiClient,
}

impl StudentSource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListSource for StudentSource {
    type Item = Student;

    fn page_size(&self) -> u32 {
        STUDENT_PAGE_SIZE
    }

    async fn fetch(
        &self,
        page: &PageRequest,
        search: &str,
        order: Option<SortOrder>,
    ) -> Result<Page<Student>, ApiError> {
        self.client
            .list_students(&ListQuery::new(page, search, order))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct ClassSource {
    client: ApiClient,
}

impl ClassSource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListSource for ClassSource {
    type Item = ClassInfo;

    fn page_size(&self) -> u32 {
        CLASS_PAGE_SIZE
    }

    async fn fetch(
        &self,
        page: &PageRequest,
        search: &str,
        order: Option<SortOrder>,
    ) -> Result<Page<ClassInfo>, ApiError> {
        self.client
            .list_classes(&ListQuery::new(page, search, order))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct UserSource {
    client: ApiClient,
}

impl UserSource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListSource for UserSource {
    type Item = User;

    fn page_size(&self) -> u32 {
        USER_PAGE_SIZE
    }

    async fn fetch(
        &self,
        page: &PageRequest,
        search: &str,
        order: Option<SortOrder>,
    ) -> Result<Page<User>, ApiError> {
        self.client
            .list_users(&ListQuery::new(page, search, order))
            .await
    }
}

/// Students enrolled in one class. The endpoint filters by student name and
/// has no sort parameter, so the order argument is ignored.
#[derive(Debug, Clone)]
pub struct ClassStudentsSource {
    client: ApiClient,
    notifier: Notifier,
    class_id: EntityId,
}

impl ClassStudentsSource {
    pub fn new(client: ApiClient, notifier: Notifier, class_id: impl Into<EntityId>) -> Self {
        Self {
            client,
            notifier,
            class_id: class_id.into(),
        }
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }
}

#[async_trait]
impl ListSource for ClassStudentsSource {
    type Item = ClassRosterMembership;

    fn page_size(&self) -> u32 {
        CLASS_STUDENTS_PAGE_SIZE
    }

    async fn fetch(
        &self,
        page: &PageRequest,
        search: &str,
        _order: Option<SortOrder>,
    ) -> Result<Page<ClassRosterMembership>, ApiError> {
        self.client
            .list_class_students(&ClassStudentsQuery::page(self.class_id.clone(), page, search))
            .await
    }
}

impl ListController<ClassStudentsSource> {
    /// Remove one membership and reload the current page. The outcome is
    /// reported as a toast either way.
    pub async fn remove_student(&self, membership_id: &str) -> Result<(), AdminError> {
        let source = self.source();
        if let Err(e) = source.client.remove_class_student(membership_id).await {
            let err = AdminError::from(e);
            tracing::warn!(
                class_id = %source.class_id,
                membership_id,
                error = %err,
                "Failed to remove student from class",
            );
            source.notifier.error(err.user_message());
            return Err(err);
        }
        tracing::info!(
            class_id = %source.class_id,
            membership_id,
            "Student removed from class",
        );
        source.notifier.success(REMOVED_MESSAGE);
        self.refresh().await;
        Ok(())
    }
}

/// Attendance sessions of one class, in server order. Search and sort do
/// not apply.
#[derive(Debug, Clone)]
pub struct ClassAttendanceSource {
    client: ApiClient,
    class_id: EntityId,
}

impl ClassAttendanceSource {
    pub fn new(client: ApiClient, class_id: impl Into<EntityId>) -> Self {
        Self {
            client,
            class_id: class_id.into(),
        }
    }
}

#[async_trait]
impl ListSource for ClassAttendanceSource {
    type Item = ClassSession;

    fn page_size(&self) -> u32 {
        CLASS_ATTENDANCE_PAGE_SIZE
    }

    async fn fetch(
        &self,
        page: &PageRequest,
        _search: &str,
        _order: Option<SortOrder>,
    ) -> Result<Page<ClassSession>, ApiError> {
        self.client
            .list_attendance(&AttendanceListQuery::new(self.class_id.clone(), page))
            .await
    }
}
