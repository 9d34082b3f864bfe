use crate::app_config::{ApplicationConfig, CaptureBackend, SinkBackend};
use crate::camera::camera_media::{OpenCvDeviceProvider, OpenCvSinkFactory};
use crate::camera::mjpeg_sink::MjpegSinkFactory;
use crate::camera::synthetic_device::SyntheticDeviceProvider;
use crate::common::file_utils;
use crate::core::capture_source::{DeviceProvider, SinkFactory};
use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

/// Device backend selected by `capture.backend`. The synthetic backend
/// exposes one device per index below `max_cameras`.
pub fn build_device_provider(config: &ApplicationConfig) -> Box<dyn DeviceProvider> {
    match config.capture.backend {
        CaptureBackend::OpenCv => {
            debug!("Using OpenCV capture backend ({:?})", config.capture.api_preference);
            Box::new(OpenCvDeviceProvider::new(config.capture.api_preference))
        }
        CaptureBackend::Synthetic => {
            let count = config.capture.max_cameras.min(u32::MAX as usize) as u32;
            debug!("Using synthetic capture backend with {} device(s)", count);
            Box::new(SyntheticDeviceProvider::new(0..count))
        }
    }
}

pub fn build_sink_factory(config: &ApplicationConfig) -> Result<Arc<dyn SinkFactory>> {
    let recording = &config.recording;
    let factory: Arc<dyn SinkFactory> = match recording.sink {
        SinkBackend::OpenCv => Arc::new(
            OpenCvSinkFactory::new(&recording.video_codec, &recording.video_format)
                .context("Failed to set up the OpenCV segment writer")?,
        ),
        SinkBackend::Mjpeg => Arc::new(MjpegSinkFactory::new(config.stream.jpeg_quality)),
    };
    Ok(factory)
}

/// Resolves the configured output directory and makes sure it exists.
pub fn prepare_output_directory(config: &ApplicationConfig) -> Result<PathBuf> {
    let dir = file_utils::resolve_output_directory(&config.recording.output_directory);
    file_utils::ensure_output_directory(&dir)
        .with_context(|| format!("❌ Failed to prepare output directory '{}'", dir.display()))
}
