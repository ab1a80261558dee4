pub mod case;
pub mod feedback;
pub mod rubric;
pub mod status;
pub mod submission;
