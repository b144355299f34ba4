pub mod job;
pub mod upload;
pub mod video;
