use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::access::store::RoleStatus;

// Role, RoleWithPermissions, and RoleStatus live in `crate::access::store`;
// this module only adds the HTTP-facing DTOs.

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenameRoleDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
}

/// Status arrives typed, so an unknown value is rejected as a 400 before
/// the service runs.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetRoleStatusDto {
    pub status: RoleStatus,
}

/// Resource and action arrive as strings and are resolved against the
/// permission catalog by the service.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GrantPermissionDto {
    #[validate(length(min = 1, message = "Resource is required"))]
    pub resource: String,
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SwitchRoleDto {
    pub role_id: Uuid,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct RoleFilterParams {
    /// Filter by lifecycle status
    pub status: Option<RoleStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleUsersResponse {
    pub role_id: Uuid,
    pub users: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_role_dto_rejects_empty_and_oversized_names() {
        let dto = CreateRoleDto {
            name: String::new(),
        };
        assert!(dto.validate().is_err());

        let dto = CreateRoleDto {
            name: "a".repeat(101),
        };
        assert!(dto.validate().is_err());

        let dto = CreateRoleDto {
            name: "registrar".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn status_dto_rejects_unknown_values() {
        let dto: Result<SetRoleStatusDto, _> = serde_json::from_str(r#"{"status":"archived"}"#);
        assert!(dto.is_err());

        let dto: SetRoleStatusDto = serde_json::from_str(r#"{"status":"inactive"}"#).unwrap();
        assert_eq!(dto.status, RoleStatus::Inactive);
    }

    #[test]
    fn grant_dto_takes_any_strings() {
        // Catalog membership is the service's concern, not the DTO's.
        let dto: GrantPermissionDto =
            serde_json::from_str(r#"{"resource":"martians","action":"abduct"}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.resource, "martians");
    }
}
