//! Middleware for request processing.
//!
//! Cross-cutting concerns between the router and the handlers:
//!
//! - [`identity`]: trusted-gateway identity extraction ([`identity::AuthContext`])
//! - [`gate`]: the access gate guarding every protected route
//!
//! # Request Flow
//!
//! 1. The upstream gateway authenticates the caller and forwards
//!    `x-user-id` and `x-active-role` headers
//! 2. [`identity::AuthContext`] parses them; absent or garbled identity is a 401
//! 3. [`gate::access_gate`] maps the matched route to its required
//!    permission and asks the decision engine
//! 4. The handler runs only on an allow; denials answer 403

pub mod gate;
pub mod identity;
