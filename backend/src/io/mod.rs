//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Handlers
//! translate requests into domain calls and domain results into JSON
//! responses; they hold no business rules of their own.

pub mod rest;
