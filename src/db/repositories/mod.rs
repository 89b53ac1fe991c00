pub mod cache;
pub mod stats;
pub mod submission;
