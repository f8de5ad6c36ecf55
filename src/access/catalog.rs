//! Permission catalog: the fixed set of resources and actions requests are
//! authorized against.
//!
//! A [`Permission`] is a (resource, action) pair such as `students:read`.
//! The catalog is the cross product of [`Resource`] and [`Action`]; strings
//! that do not parse into these enums name nothing grantable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Entity types subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Students,
    Staff,
    Departments,
    Sections,
    Roles,
}

/// Operations on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

/// Error returned when a string names no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCatalogEntry(pub String);

impl fmt::Display for UnknownCatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not in the permission catalog", self.0)
    }
}

impl std::error::Error for UnknownCatalogEntry {}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Students,
        Resource::Staff,
        Resource::Departments,
        Resource::Sections,
        Resource::Roles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Students => "students",
            Resource::Staff => "staff",
            Resource::Departments => "departments",
            Resource::Sections => "sections",
            Resource::Roles => "roles",
        }
    }
}

impl FromStr for Resource {
    type Err = UnknownCatalogEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "students" => Ok(Resource::Students),
            "staff" => Ok(Resource::Staff),
            "departments" => Ok(Resource::Departments),
            "sections" => Ok(Resource::Sections),
            "roles" => Ok(Resource::Roles),
            other => Err(UnknownCatalogEntry(other.to_string())),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl FromStr for Action {
    type Err = UnknownCatalogEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(UnknownCatalogEntry(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Permission {
    pub fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Every (resource, action) pair the catalog contains.
    pub fn all() -> impl Iterator<Item = Permission> {
        Resource::ALL.into_iter().flat_map(|resource| {
            Action::ALL
                .into_iter()
                .map(move |action| Permission::new(resource, action))
        })
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(resource.as_str().parse::<Resource>(), Ok(resource));
        }
    }

    #[test]
    fn test_action_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_unknown_strings_rejected() {
        assert!("schools".parse::<Resource>().is_err());
        assert!("Students".parse::<Resource>().is_err());
        assert!("write".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn test_catalog_is_full_cross_product() {
        let all: Vec<Permission> = Permission::all().collect();
        assert_eq!(all.len(), Resource::ALL.len() * Action::ALL.len());
        assert!(all.contains(&Permission::new(Resource::Students, Action::Delete)));
    }

    #[test]
    fn test_permission_display() {
        let permission = Permission::new(Resource::Students, Action::Read);
        assert_eq!(permission.to_string(), "students:read");
    }
}
