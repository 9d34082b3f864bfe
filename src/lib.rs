//! Always-on camera node: every attached camera gets a capture loop feeding a
//! single-slot frame buffer, a recording loop writing rolling segments with
//! retention, and any number of live multipart JPEG streams.

pub mod app_config;
pub mod camera;
pub mod cli;
pub mod common;
pub mod config_loader;
pub mod core;
pub mod errors;
pub mod operations;
pub mod server;
