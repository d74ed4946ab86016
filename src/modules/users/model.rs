//! User data models.
//!
//! The [`Role`] enum is the single source for role names; its serialized
//! form (`estudiante`, `maestro`, `admin`) is what the session token claim
//! and the UserProfile document carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Estudiante,
    Maestro,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Estudiante => "estudiante",
            Role::Maestro => "maestro",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRole;

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "estudiante" => Ok(Role::Estudiante),
            "maestro" => Ok(Role::Maestro),
            "admin" => Ok(Role::Admin),
            _ => Err(InvalidRole),
        }
    }
}

/// DTO for the admin display-name update.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[serde(rename = "displayName")]
    #[validate(length(min = 1, message = "Falta displayName"))]
    pub display_name: String,
}

/// Listing of every UserProfile document, id included.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Estudiante, Role::Maestro, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!("director".parse::<Role>(), Err(InvalidRole));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Maestro).unwrap(), r#""maestro""#);
        let role: Role = serde_json::from_str(r#""estudiante""#).unwrap();
        assert_eq!(role, Role::Estudiante);
    }

    #[test]
    fn test_update_user_dto_validation() {
        let dto = UpdateUserDto {
            display_name: "Ana".to_string(),
        };
        assert!(dto.validate().is_ok());

        let empty = UpdateUserDto {
            display_name: String::new(),
        };
        assert!(empty.validate().is_err());
    }
}
