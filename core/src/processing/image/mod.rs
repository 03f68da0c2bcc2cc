pub mod download;
pub mod resize;
