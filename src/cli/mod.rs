//! Command-line administrative tools.
//!
//! A fresh deployment has no roles, so no request can pass the access
//! gate. The seeder bootstraps an administrator role with the full
//! permission catalog; `assign-role` links users to roles, standing in
//! for the identity collaborator that owns user lifecycle in production.

pub mod seeder;
