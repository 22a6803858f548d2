//! # flowkit-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Manage the `SQLite` connection pool and run embedded migrations
//! - Provide the persistence context (one pooled connection) that entity
//!   services are built around
//! - Implement a load-by-guid entity service per stored entity kind and
//!   register them into the loader's service catalog
//! - Implement the read-side repository ports used by the action components
//! - Write records, for fixtures and seeding
//!
//! ## Dependency rule
//! Depends on `flowkit-app` (for port traits) and `flowkit-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod activity_type_repo;
pub mod attribute_repo;
pub mod context;
pub mod entity_service;
pub mod entity_type_repo;
pub mod error;
pub mod group_member_repo;
pub mod group_role_repo;
pub mod pool;
pub mod registry;
pub mod seed;
pub mod tables;

pub use context::{SqliteContext, SqliteContextFactory};
pub use entity_service::SqliteService;
pub use registry::register_services;
