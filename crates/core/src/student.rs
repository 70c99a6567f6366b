//! Student records and the forms that edit them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};
use crate::validation::{validate_cpf, validate_not_blank};

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// The subset of a student needed to render a roster row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl StudentSummary {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
        }
    }
}

/// Enrollment status of a student at the organisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    WaitingList,
}

impl StudentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Ativo",
            Self::Inactive => "Inativo",
            Self::WaitingList => "Lista de espera",
        }
    }
}

/// A full student record as returned by `GET /students/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default)]
    pub status_reason: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Student {
    pub fn summary(&self) -> StudentSummary {
        StudentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// "Dados do Aluno" step of the registration wizard; also the body of
/// `POST /students` and `PUT /students/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentDataForm {
    #[validate(
        length(min = 3, max = 120, message = "Nome deve ter entre 3 e 120 caracteres"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,
    #[validate(email(message = "E-mail inválido"))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 20, message = "Telefone inválido"))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 120))]
    pub school: Option<String>,
    #[validate(length(max = 40))]
    pub grade: Option<String>,
}

impl StudentDataForm {
    /// Pre-fill the form from an existing record.
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            birth_date: student.birth_date,
            cpf: student.cpf.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
            address: student.address.clone(),
            school: student.school.clone(),
            grade: student.grade.clone(),
        }
    }
}

/// Body of `PATCH /students/:id/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatusUpdate {
    pub status: StudentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StudentStatusUpdate {
    /// A reason is mandatory when a student leaves the active roster.
    pub fn validate(&self) -> Result<(), CoreError> {
        let has_reason = self
            .reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        if self.status == StudentStatus::Inactive && !has_reason {
            let mut fields = crate::error::FieldErrors::new();
            fields.insert(
                "reason".to_string(),
                vec!["Informe o motivo da inativação".to_string()],
            );
            return Err(CoreError::InvalidForm(fields));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;

    fn valid_form() -> StudentDataForm {
        StudentDataForm {
            name: "Ana Clara".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2012, 3, 14),
            cpf: Some("123.456.789-09".to_string()),
            email: Some("ana@example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(validate_form(&valid_form()).is_ok());
    }

    #[test]
    fn short_name_and_bad_email_are_reported_per_field() {
        let form = StudentDataForm {
            name: "Al".to_string(),
            email: Some("not-an-email".to_string()),
            ..valid_form()
        };
        let err = validate_form(&form).unwrap_err();
        let fields = err.field_errors().expect("form errors");
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("cpf"));
    }

    #[test]
    fn bad_cpf_is_reported() {
        let form = StudentDataForm {
            cpf: Some("123".to_string()),
            ..valid_form()
        };
        let err = validate_form(&form).unwrap_err();
        assert_eq!(
            err.field_errors().unwrap()["cpf"],
            vec!["CPF deve conter 11 dígitos".to_string()]
        );
    }

    #[test]
    fn deactivation_requires_reason() {
        let update = StudentStatusUpdate {
            status: StudentStatus::Inactive,
            reason: Some("  ".to_string()),
        };
        assert!(update.validate().is_err());

        let update = StudentStatusUpdate {
            status: StudentStatus::Inactive,
            reason: Some("Mudou de cidade".to_string()),
        };
        assert!(update.validate().is_ok());

        let update = StudentStatusUpdate {
            status: StudentStatus::Active,
            reason: None,
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn student_deserializes_with_missing_optionals() {
        let student: Student = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "name": "Bruno",
            "status": "WAITING_LIST"
        }))
        .unwrap();
        assert_eq!(student.status, StudentStatus::WaitingList);
        assert_eq!(student.summary().name, "Bruno");
        assert!(student.avatar_url.is_none());
    }
}
