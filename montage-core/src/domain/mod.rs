pub mod job;
pub mod owner;
pub mod upload;
pub mod video;
