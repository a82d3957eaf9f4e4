//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequirePermission`] -- Requires one permission action in the token claims.

pub mod auth;
pub mod rbac;
