//! Student records.
//!
//! CRUD collaborator behind the access gate. Student records are reviewed
//! (enrollment toggled by a named reviewer) rather than deleted.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
