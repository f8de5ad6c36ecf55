//! Caller identity extraction.
//!
//! Authentication is owned by an upstream identity provider; by the time a
//! request reaches this service a trusted gateway has verified the caller
//! and forwarded the identity as headers. [`AuthContext`] reads them:
//!
//! - `x-user-id`: the authenticated user, required
//! - `x-active-role`: the role the caller is acting under, required on
//!   every route behind the access gate

use anyhow::anyhow;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::utils::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ACTIVE_ROLE_HEADER: &str = "x-active-role";

/// Verified identity of the current request's caller.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub active_role_id: Option<Uuid>,
}

impl AuthContext {
    /// The active-role claim, or 401 when the caller sent none.
    pub fn active_role_id(&self) -> Result<Uuid, AppError> {
        self.active_role_id.ok_or_else(|| {
            AppError::unauthorized(anyhow!("Missing {} header", ACTIVE_ROLE_HEADER))
        })
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The gate stores the context it already extracted; handlers behind
        // it see the same identity without re-parsing headers.
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(ctx.clone());
        }

        let user_id = parse_uuid_header(parts, USER_ID_HEADER)?
            .ok_or_else(|| AppError::unauthorized(anyhow!("Missing {} header", USER_ID_HEADER)))?;
        let active_role_id = parse_uuid_header(parts, ACTIVE_ROLE_HEADER)?;

        Ok(AuthContext {
            user_id,
            active_role_id,
        })
    }
}

fn parse_uuid_header(parts: &Parts, name: &str) -> Result<Option<Uuid>, AppError> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized(anyhow!("Invalid {} header", name)))?;

    Uuid::parse_str(value)
        .map(Some)
        .map_err(|_| AppError::unauthorized(anyhow!("Invalid {} header", name)))
}
