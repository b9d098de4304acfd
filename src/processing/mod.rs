pub mod angle;
pub mod downsampling;
