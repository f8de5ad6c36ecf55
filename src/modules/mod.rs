//! Feature modules.
//!
//! Each module follows the same four-file shape: `router.rs` mounts the
//! routes, `controller.rs` holds the HTTP handlers, `service.rs` the
//! business logic, `model.rs` the DTOs and row types.
//!
//! `roles` is the administrative surface over the access-control core in
//! [`crate::access`]; the rest are record-keeping collaborators that sit
//! behind the access gate.

pub mod departments;
pub mod roles;
pub mod sections;
pub mod staff;
pub mod students;

pub use self::departments::model::MessageResponse;
