pub mod camera_entity;
pub mod camera_media;
pub mod capture_loop;
pub mod mjpeg_sink;
pub mod recording_loop;
pub mod synthetic_device;
