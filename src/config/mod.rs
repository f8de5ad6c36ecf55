//! Configuration modules for the Hallpass API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with sensible defaults.
//!
//! # Modules
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`gate`]: Access gate timing
//! - [`server`]: HTTP listener address
//!
//! # Environment Variables
//!
//! Only `DATABASE_URL` is required; everything else has a default. See
//! each submodule for specific variable names.

pub mod cors;
pub mod database;
pub mod gate;
pub mod server;
