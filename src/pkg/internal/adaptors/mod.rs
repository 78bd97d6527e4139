pub mod jobs;
pub mod saved;
