pub mod merge;
pub mod resume;
