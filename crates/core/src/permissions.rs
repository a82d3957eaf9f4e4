//! Well-known permission actions and permission-resolution helpers.
//!
//! The action constants must match the seed data in
//! `20241204000007_seed_default_rbac.sql`. Each protected endpoint requires
//! exactly one of these actions to be present in the caller's token claims.

use std::collections::HashSet;

/// Name of the seeded administrator role (granted every permission).
pub const ROLE_ADMIN: &str = "admin";

pub const CREATE_ROLE: &str = "CreateRole";
pub const GET_ROLE: &str = "GetRole";
pub const UPDATE_ROLE: &str = "UpdateRole";
pub const DELETE_ROLE: &str = "DeleteRole";

pub const CREATE_PERMISSION: &str = "CreatePermission";
pub const GET_PERMISSION: &str = "GetPermission";
pub const UPDATE_PERMISSION: &str = "UpdatePermission";
pub const DELETE_PERMISSION: &str = "DeletePermission";

pub const CREATE_USER: &str = "CreateUser";
pub const GET_USER: &str = "GetUser";
pub const UPDATE_USER: &str = "UpdateUser";
pub const DELETE_USER: &str = "DeleteUser";

/// Permission group names used by the seed data.
pub mod groups {
    pub const ROLE_AND_PERMISSION: &str = "Role & Permission";
    pub const USER_MANAGEMENT: &str = "User Management";
}

/// Every seeded permission action.
pub const ALL_ACTIONS: &[&str] = &[
    CREATE_ROLE,
    CREATE_PERMISSION,
    UPDATE_ROLE,
    UPDATE_PERMISSION,
    DELETE_ROLE,
    DELETE_PERMISSION,
    GET_ROLE,
    GET_PERMISSION,
    CREATE_USER,
    GET_USER,
    UPDATE_USER,
    DELETE_USER,
];

/// Collapse duplicate actions while keeping first-seen order.
pub fn dedup_actions(requested: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(requested.len());
    requested
        .iter()
        .filter(|a| seen.insert(a.as_str()))
        .cloned()
        .collect()
}

/// Return the requested actions that are absent from `found`.
///
/// The result preserves request order and contains each missing action
/// once. An empty result means every requested action resolved.
pub fn missing_actions<'a, I>(requested: &[String], found: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let found: HashSet<&str> = found.into_iter().collect();
    dedup_actions(requested)
        .into_iter()
        .filter(|a| !found.contains(a.as_str()))
        .collect()
}

/// Check whether a claim list grants `required`.
pub fn grants(claims: &[String], required: &str) -> bool {
    claims.iter().any(|p| p == required)
}
