//! Role-and-permission access control core.
//!
//! - [`catalog`]: the fixed (resource, action) permission catalog
//! - [`store`]: role records, permission grants, role assignments
//! - [`decision`]: the allow/deny engine consulted by the access gate

pub mod catalog;
pub mod decision;
pub mod store;
