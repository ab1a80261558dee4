//! debrief-storage
//!
//! Header-indexed tabular storage and the loaders built on it: rubric,
//! case briefs, and the submission responses table.

pub mod cases;
pub mod error;
pub mod json_file;
pub mod responses;
pub mod rubric;
pub mod table;
pub mod workbook;
