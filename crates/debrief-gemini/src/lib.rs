//! debrief-gemini
//!
//! Prompt construction and structured-output calls to the Gemini
//! `generateContent` API.

pub mod client;
pub mod error;
pub mod prompt;
pub mod structured;
