//! Shared utilities for the Hallpass API.
//!
//! - [`errors`]: Application error types and response mapping
//! - [`pagination`]: Limit/offset query parameters and list metadata

pub mod errors;
pub mod pagination;
