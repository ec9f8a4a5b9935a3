pub mod format;
pub mod jobs;
pub mod specs;
pub mod usage;
