//! Storage gateway for fieldkit.
//!
//! The field contract never talks to a database driver directly. It builds
//! [`SqlFragment`]s and hands them to a [`StorageGateway`]. This crate ships
//! the gateway trait and a SQLite implementation.
//!
//! # Architecture
//!
//! - Fragments carry SQL text and bound values separately
//! - Rendering to literal text (with escaping) happens only at the boundary
//! - Identifiers are validated before they are spliced into statements
//! - The SQLite gateway registers a `regexp` function for `REGEXP` filters

mod error;
mod gateway;
mod sql;
mod sqlite;

pub use error::{DbError, DbResult};
pub use gateway::StorageGateway;
pub use sql::{Row, SqlFragment, SqlValue, escape_literal, quote_ident};
pub use sqlite::SqliteGateway;
