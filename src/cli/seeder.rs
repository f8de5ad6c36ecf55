use anyhow::anyhow;
use uuid::Uuid;

use crate::access::catalog::Permission;
use crate::access::store::{Role, RoleStatus, RoleStore, RoleWithPermissions};
use crate::utils::errors::AppError;

/// Creates (or finds) a role by name, grants it every catalog permission,
/// and activates it. Idempotent: re-running against an existing role only
/// re-applies grants, which are no-ops.
pub async fn seed_admin_role(
    store: &dyn RoleStore,
    name: &str,
) -> Result<RoleWithPermissions, AppError> {
    let role = find_or_create_role(store, name).await?;

    for permission in Permission::all() {
        store.grant_permission(role.id, permission).await?;
    }

    let role = store.set_role_status(role.id, RoleStatus::Active).await?;
    let permissions = store
        .list_permissions(role.id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;

    Ok(RoleWithPermissions { role, permissions })
}

async fn find_or_create_role(store: &dyn RoleStore, name: &str) -> Result<Role, AppError> {
    let lowered = name.to_lowercase();
    let existing = store
        .list_roles(None)
        .await?
        .into_iter()
        .find(|role| role.name.to_lowercase() == lowered);

    match existing {
        Some(role) => Ok(role),
        None => store.create_role(name).await,
    }
}

/// Links a user to a role and makes it their active role. Used to hand the
/// first administrator their seat; thereafter assignments come from the
/// identity collaborator and switching happens over the API.
pub async fn assign_and_activate(
    store: &dyn RoleStore,
    user_id: Uuid,
    role_id: Uuid,
) -> Result<RoleWithPermissions, AppError> {
    store.assign_role(user_id, role_id).await?;
    store.switch_active_role(user_id, role_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::catalog::{Action, Resource};
    use crate::access::store::MemoryRoleStore;

    #[tokio::test]
    async fn seeding_yields_an_active_role_with_the_full_catalog() {
        let store = MemoryRoleStore::new();

        let seeded = seed_admin_role(&store, "admin").await.unwrap();
        assert_eq!(seeded.role.status, RoleStatus::Active);
        assert_eq!(seeded.permissions.len(), Permission::all().count());
    }

    #[tokio::test]
    async fn seeding_twice_changes_nothing() {
        let store = MemoryRoleStore::new();

        let first = seed_admin_role(&store, "admin").await.unwrap();
        let second = seed_admin_role(&store, "Admin").await.unwrap();

        assert_eq!(first.role.id, second.role.id);
        assert_eq!(first.permissions, second.permissions);
        assert_eq!(store.list_roles(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn assigning_activates_the_role_for_the_user() {
        let store = MemoryRoleStore::new();
        let user = Uuid::new_v4();

        let seeded = seed_admin_role(&store, "admin").await.unwrap();
        let active = assign_and_activate(&store, user, seeded.role.id)
            .await
            .unwrap();

        assert_eq!(active.role.id, seeded.role.id);
        assert_eq!(store.active_role_id(user).await.unwrap(), Some(seeded.role.id));
        assert!(
            active
                .permissions
                .contains(&Permission::new(Resource::Roles, Action::Update))
        );
    }
}
