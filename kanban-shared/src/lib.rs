//! # Kanban Shared Library
//!
//! Data layer and board logic used by the Kanban API server and the seed
//! tool.
//!
//! ## Module Organization
//!
//! - `validation`: Id checks, plain-text sanitization, assignee rules
//! - `models`: Column and task records with their SQL operations
//! - `services`: Validated column and task operations
//! - `board`: Board controller (drag and drop, new-task form, lanes)
//! - `db`: Connection pool, migrations and seeding
//! - `error`: Service error type

pub mod board;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod validation;

/// Current version of the Kanban shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
