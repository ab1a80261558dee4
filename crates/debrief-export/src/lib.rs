//! debrief-export
//!
//! Turns structured model feedback into the narrative stored on the
//! submission and the email sent to the trainee.

pub mod email;
pub mod error;
pub mod narrative;
