use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::Role;
use crate::utils::password::validate_password_strength;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Correo inválido"))]
    pub email: String,
    #[validate(custom(function = validate_password_strength))]
    pub password: String,
    /// Requested role; defaults to `estudiante`.
    pub role: Option<Role>,
    /// Out-of-band shared secret, required when `role` is `admin`.
    pub admin_secret: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub uid: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Faltan email/password"))]
    pub email: String,
    #[validate(length(min = 1, message = "Faltan email/password"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }

    pub fn success() -> Self {
        Self { status: "success" }
    }

    pub fn logged_out() -> Self {
        Self { status: "logged_out" }
    }
}

/// Shape of the merged profile payload, for the API documentation. The
/// handler itself returns the stored fields verbatim plus the resolved role,
/// so deployments with extra profile fields pass them through untouched.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub uid: String,
    pub email: String,
    pub role: Role,
    pub created_at: Option<String>,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_strong_password() {
        let dto: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@x.com","password":"Abcdef1!","role":"estudiante"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.role, Some(Role::Estudiante));
    }

    #[test]
    fn test_register_request_rejects_weak_password() {
        let dto: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":"abcdefgh"}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let dto: RegisterRequest =
            serde_json::from_str(r#"{"email":"not-an-email","password":"Abcdef1!"}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_request_reads_admin_secret() {
        let dto: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@x.com","password":"Abcdef1!","role":"admin","adminSecret":"s3cret"}"#,
        )
        .unwrap();
        assert_eq!(dto.role, Some(Role::Admin));
        assert_eq!(dto.admin_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_login_request_requires_fields() {
        let dto = LoginRequest {
            email: String::new(),
            password: "x".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
