//! Repository layer.
//!
//! Each repository is a zero-sized struct. Single-statement methods accept
//! any `PgExecutor` so they run equally against the pool or inside a
//! handler's transaction; multi-statement methods take `&mut PgConnection`
//! and expect the caller to own the transaction.

pub mod audit_repo;
pub mod permission_repo;
pub mod role_permission_repo;
pub mod role_repo;
pub mod user_repo;

pub use audit_repo::AuditRepo;
pub use permission_repo::PermissionRepo;
pub use role_permission_repo::RolePermissionRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
