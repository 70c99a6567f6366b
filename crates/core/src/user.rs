//! Staff users and their roles.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::EntityId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    #[default]
    Teacher,
    Staff,
}

impl UserRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrador",
            Self::Teacher => "Educador",
            Self::Staff => "Colaborador",
        }
    }

    /// Only administrators manage staff accounts.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Body of `POST /users` and `PUT /users/:id`.
///
/// `password` is required on creation and optional on update; the
/// controller enforces that distinction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    #[validate(length(min = 3, max = 120, message = "Nome deve ter entre 3 e 120 caracteres"))]
    pub name: String,
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "Senha deve ter ao menos 8 caracteres"))]
    pub password: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    #[validate(length(min = 1, message = "Informe a senha"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;

    #[test]
    fn only_admins_manage_users() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(!UserRole::Teacher.can_manage_users());
        assert!(!UserRole::Staff.can_manage_users());
    }

    #[test]
    fn user_form_password_is_optional_but_checked() {
        let mut form = UserForm {
            name: "Maria".to_string(),
            email: "maria@casa.org".to_string(),
            role: UserRole::Staff,
            password: None,
        };
        assert!(validate_form(&form).is_ok());

        form.password = Some("short".to_string());
        let err = validate_form(&form).unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("password"));
    }

    #[test]
    fn login_form_requires_email_and_password() {
        let form = LoginForm {
            email: "nope".to_string(),
            password: String::new(),
        };
        let err = validate_form(&form).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "ADMIN");
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1", "name": "Rita", "email": "rita@casa.org"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Teacher);
    }
}
