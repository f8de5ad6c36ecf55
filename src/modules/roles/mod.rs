//! Role administration and role switching.
//!
//! Role records themselves live in [`crate::access`]; this module is the
//! HTTP surface over them: create/list/get/rename, status toggling,
//! permission grants, assignment listing, and the authenticated
//! switch-active-role endpoint.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
