//! Student endpoints.

use reqwest::Method;

use casa_core::pagination::Page;
use casa_core::student::{Student, StudentDataForm, StudentStatusUpdate};

use crate::api::{ApiClient, ApiError};
use crate::query::ListQuery;

impl ApiClient {
    /// `GET /students?skip&take&name&orderBy`
    pub async fn list_students(&self, query: &ListQuery) -> Result<Page<Student>, ApiError> {
        let builder = self.request(Method::GET, "/students")?.query(query);
        Self::send_json(builder).await
    }

    /// `GET /students/:id`
    pub async fn get_student(&self, id: &str) -> Result<Student, ApiError> {
        let builder = self.request(Method::GET, &format!("/students/{id}"))?;
        Self::send_json(builder).await
    }

    /// `POST /students`
    pub async fn create_student(&self, form: &StudentDataForm) -> Result<Student, ApiError> {
        let builder = self.request(Method::POST, "/students")?.json(form);
        Self::send_json(builder).await
    }

    /// `PUT /students/:id`
    pub async fn update_student(
        &self,
        id: &str,
        form: &StudentDataForm,
    ) -> Result<Student, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/students/{id}"))?
            .json(form);
        Self::send_json(builder).await
    }

    /// `PATCH /students/:id/status`
    pub async fn update_student_status(
        &self,
        id: &str,
        update: &StudentStatusUpdate,
    ) -> Result<Student, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/students/{id}/status"))?
            .json(update);
        Self::send_json(builder).await
    }
}
