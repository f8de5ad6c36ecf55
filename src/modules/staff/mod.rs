//! Staff records.
//!
//! Mirrors the student module: staff are reviewed in and out of employment
//! through the status endpoint, never deleted.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
