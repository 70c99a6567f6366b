//! Class ("oficina") and class-membership endpoints.

use reqwest::Method;

use casa_core::class::{ClassForm, ClassInfo, ClassRosterMembership, EnrollStudents};
use casa_core::pagination::Page;

use crate::api::{ApiClient, ApiError};
use crate::query::{ClassStudentsQuery, ListQuery};

impl ApiClient {
    /// `GET /classes?skip&take&name&orderBy`
    pub async fn list_classes(&self, query: &ListQuery) -> Result<Page<ClassInfo>, ApiError> {
        let builder = self.request(Method::GET, "/classes")?.query(query);
        Self::send_json(builder).await
    }

    /// `GET /classes/:id`
    pub async fn get_class(&self, id: &str) -> Result<ClassInfo, ApiError> {
        let builder = self.request(Method::GET, &format!("/classes/{id}"))?;
        Self::send_json(builder).await
    }

    /// `POST /classes`
    pub async fn create_class(&self, form: &ClassForm) -> Result<ClassInfo, ApiError> {
        let builder = self.request(Method::POST, "/classes")?.json(form);
        Self::send_json(builder).await
    }

    /// `PUT /classes/:id`
    pub async fn update_class(&self, id: &str, form: &ClassForm) -> Result<ClassInfo, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/classes/{id}"))?
            .json(form);
        Self::send_json(builder).await
    }

    /// `GET /student-classes?classId&skip&take&studentName`
    pub async fn list_class_students(
        &self,
        query: &ClassStudentsQuery,
    ) -> Result<Page<ClassRosterMembership>, ApiError> {
        let builder = self.request(Method::GET, "/student-classes")?.query(query);
        Self::send_json(builder).await
    }

    /// `POST /student-classes` with `{ classId, studentIds }`.
    pub async fn enroll_students(&self, body: &EnrollStudents) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "/student-classes")?.json(body);
        Self::send_empty(builder).await
    }

    /// `DELETE /student-classes/:membership_id`
    pub async fn remove_class_student(&self, membership_id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/student-classes/{membership_id}"))?;
        Self::send_empty(builder).await
    }
}
