pub mod resume;
pub mod submission;
