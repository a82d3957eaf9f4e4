//! Domain building blocks shared by every crate in the workspace.
//!
//! This crate performs no I/O. It holds the identifier and timestamp
//! aliases, the domain error type, the permission vocabulary, and the pure
//! logic behind permission resolution and audit snapshots.

pub mod audit;
pub mod email;
pub mod error;
pub mod permissions;
pub mod types;
