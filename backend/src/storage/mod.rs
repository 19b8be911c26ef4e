//! # Storage Module
//!
//! Persistence for the baby tracker: one JSON document per deployment holding
//! an array per collection plus the identity records.
//!
//! The document is loaded once at startup and flushed to disk after every
//! mutation. Writers work on a copy of the document and only swap it in after
//! the flush succeeded, so memory never runs ahead of disk.
//!
//! - **database**: the document shape and its load-time migration
//! - **collections**: typed access from a record type to its array
//! - **connection**: the owned store handle (`JsonConnection`) shared by services

pub mod collections;
pub mod connection;
pub mod database;

pub use collections::StoredCollection;
pub use connection::JsonConnection;
pub use database::Database;
