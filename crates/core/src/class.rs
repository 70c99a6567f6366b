//! Classes ("oficinas") and roster memberships.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::student::StudentSummary;
use crate::types::EntityId;
use crate::validation::validate_not_blank;

/// A class as listed by `GET /classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub student_count: Option<u32>,
}

/// A student's enrollment in a class, as returned by `GET /student-classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRosterMembership {
    /// Id of the membership row itself (used to remove the enrollment).
    pub id: EntityId,
    #[serde(default)]
    pub class_id: Option<EntityId>,
    pub student: StudentSummary,
}

impl ClassRosterMembership {
    pub fn student_id(&self) -> &str {
        &self.student.id
    }
}

/// Body of `POST /classes` and `PUT /classes/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassForm {
    #[validate(
        length(min = 3, max = 80, message = "Nome deve ter entre 3 e 80 caracteres"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(length(max = 500, message = "Descrição deve ter no máximo 500 caracteres"))]
    pub description: Option<String>,
    pub teacher_id: Option<EntityId>,
    #[validate(length(max = 120))]
    pub schedule: Option<String>,
}

/// Body of `POST /student-classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollStudents {
    pub class_id: EntityId,
    pub student_ids: Vec<EntityId>,
}
