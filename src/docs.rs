use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::access::catalog::{Action, Permission, Resource};
use crate::access::store::{Role, RoleStatus, RoleWithPermissions};
use crate::middleware::identity::{ACTIVE_ROLE_HEADER, USER_ID_HEADER};
use crate::modules::departments::model::{
    CreateDepartmentDto, Department, MessageResponse, UpdateDepartmentDto,
};
use crate::modules::roles::model::{
    CreateRoleDto, GrantPermissionDto, RenameRoleDto, RoleUsersResponse, SetRoleStatusDto,
    SwitchRoleDto,
};
use crate::modules::sections::model::{CreateSectionDto, Section, UpdateSectionDto};
use crate::modules::staff::model::{
    CreateStaffDto, PaginatedStaffResponse, ReviewStaffStatusDto, StaffMember, UpdateStaffDto,
};
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, ReviewStudentStatusDto, Student, UpdateStudentDto,
};
use crate::utils::errors::ErrorResponse;
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::roles::controller::create_role,
        crate::modules::roles::controller::list_roles,
        crate::modules::roles::controller::get_role,
        crate::modules::roles::controller::rename_role,
        crate::modules::roles::controller::set_role_status,
        crate::modules::roles::controller::grant_role_permission,
        crate::modules::roles::controller::list_role_permissions,
        crate::modules::roles::controller::list_role_users,
        crate::modules::roles::controller::switch_role,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::review_student_status,
        crate::modules::staff::controller::create_staff,
        crate::modules::staff::controller::get_staff_members,
        crate::modules::staff::controller::get_staff_member,
        crate::modules::staff::controller::update_staff,
        crate::modules::staff::controller::review_staff_status,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::sections::controller::create_section,
        crate::modules::sections::controller::get_sections,
        crate::modules::sections::controller::get_section,
        crate::modules::sections::controller::update_section,
        crate::modules::sections::controller::delete_section,
    ),
    components(
        schemas(
            Resource,
            Action,
            Permission,
            Role,
            RoleStatus,
            RoleWithPermissions,
            CreateRoleDto,
            RenameRoleDto,
            SetRoleStatusDto,
            GrantPermissionDto,
            SwitchRoleDto,
            RoleUsersResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            ReviewStudentStatusDto,
            PaginatedStudentsResponse,
            StaffMember,
            CreateStaffDto,
            UpdateStaffDto,
            ReviewStaffStatusDto,
            PaginatedStaffResponse,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            Section,
            CreateSectionDto,
            UpdateSectionDto,
            MessageResponse,
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Roles", description = "Role administration and role switching"),
        (name = "Students", description = "Student record management"),
        (name = "Staff", description = "Staff record management"),
        (name = "Departments", description = "Department management"),
        (name = "Sections", description = "Class section management")
    ),
    info(
        title = "Hallpass API",
        description = "School-administration backend with data-driven role-based access control",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

/// Identity arrives as trusted gateway headers, documented here as API-key
/// security schemes so the interactive UIs can supply them.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_id_header",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(USER_ID_HEADER))),
            );
            components.add_security_scheme(
                "active_role_header",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ACTIVE_ROLE_HEADER))),
            );
        }
    }
}
