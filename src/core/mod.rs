pub mod camera_manager;
pub mod capture_source;
pub mod frame;
pub mod frame_buffer;
pub mod pacing;
pub mod retention;
