//! debrief-core
//!
//! Pure domain types and table schema for the Debrief feedback system.
//! No I/O here: this is the shared vocabulary of the other crates.

pub mod error;
pub mod models;
pub mod schema;
