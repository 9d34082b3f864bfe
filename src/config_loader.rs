use crate::app_config::{ApplicationConfig, MAX_SEGMENT_SECONDS, SECONDS_PER_HOUR};
use crate::common::timestamp_utils;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_CONFIG_PATH: &str = "config/camwatch.yaml";

/// Loads the YAML configuration at `path`.
///
/// When `explicit` is false and the file does not exist, the built-in defaults
/// are used instead. A file that exists but fails to parse or validate is
/// always an error.
pub fn load_config(path: &str, explicit: bool) -> Result<ApplicationConfig> {
    debug!("📄 Attempting to load config from: {}", path);
    let start_time = Instant::now();

    if !explicit && !Path::new(path).exists() {
        info!("ℹ️ No configuration file at '{}', using built-in defaults.", path);
        let config = ApplicationConfig::default();
        validate_config(&config).context("Default configuration validation failed 👎")?;
        return Ok(config);
    }

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file '{}'. 📖", path))?;
    debug!("Read config file in {:?}", start_time.elapsed());

    let config = parse_config(&config_str)
        .with_context(|| format!("Failed to load configuration from '{}'. 💔", path))?;

    info!("✅ Successfully loaded and validated configuration from '{}' in {:?}", path, start_time.elapsed());
    Ok(config)
}

pub fn parse_config(config_str: &str) -> Result<ApplicationConfig> {
    let parse_start_time = Instant::now();
    // An empty document deserializes to unit, not to a struct of defaults.
    let config: ApplicationConfig = if config_str.trim().is_empty() {
        ApplicationConfig::default()
    } else {
        serde_yaml::from_str(config_str).context("Failed to parse YAML configuration")?
    };
    debug!("Parsed YAML in {:?}", parse_start_time.elapsed());

    validate_config(&config).context("Configuration validation failed 👎")?;
    Ok(config)
}

pub fn validate_config(config: &ApplicationConfig) -> Result<()> {
    debug!("🕵️ Validating configuration...");
    let capture = &config.capture;
    if capture.width == 0 || capture.height == 0 {
        bail!("❌ Capture resolution must be positive, got {}x{}.", capture.width, capture.height);
    }
    if capture.fps == 0 {
        bail!("❌ Capture fps must be positive.");
    }
    if capture.max_cameras == 0 {
        bail!("❌ max_cameras must be at least 1.");
    }
    if capture.probe_limit == 0 {
        bail!("❌ probe_limit must be at least 1.");
    }

    let recording = &config.recording;
    if recording.output_directory.trim().is_empty() {
        bail!("❌ Recording output_directory cannot be empty.");
    }
    if recording.segment_seconds == 0 {
        bail!("❌ segment_seconds must be at least 1.");
    }
    if recording.segment_seconds > MAX_SEGMENT_SECONDS {
        bail!(
            "❌ segment_seconds must be at most {}, got {}.",
            MAX_SEGMENT_SECONDS,
            recording.segment_seconds
        );
    }
    if recording.retention_hours == 0 {
        bail!("❌ retention_hours must be at least 1.");
    }
    if recording.retention_hours.checked_mul(SECONDS_PER_HOUR).is_none() {
        bail!("❌ retention_hours {} is too large.", recording.retention_hours);
    }
    if recording.video_format.is_empty() {
        bail!("❌ Recording video_format cannot be empty.");
    }
    if recording.video_codec.chars().count() != 4 {
        bail!("❌ Recording video_codec '{}' must be a 4-character FOURCC.", recording.video_codec);
    }
    if recording.filename_timestamp_format.is_empty() {
        bail!("❌ filename_timestamp_format cannot be empty.");
    }
    if !timestamp_utils::is_valid_timestamp_format(&recording.filename_timestamp_format) {
        bail!(
            "❌ filename_timestamp_format '{}' is not a valid strftime pattern.",
            recording.filename_timestamp_format
        );
    }

    if !(1..=100).contains(&config.stream.jpeg_quality) {
        bail!("❌ Stream jpeg_quality must be within 1..=100, got {}.", config.stream.jpeg_quality);
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        bail!("❌ Invalid server bind_address '{}'.", config.server.bind_address);
    }

    debug!("👍 Configuration validated.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::{CaptureBackend, SinkBackend};
    use std::time::Duration;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.capture.height, 480);
        assert_eq!(config.capture.fps, 20);
        assert_eq!(config.capture.max_cameras, 4);
        assert_eq!(config.recording.segment_seconds, 60);
        assert_eq!(config.recording.retention_hours, 24);
        assert_eq!(config.recording.output_directory, "save");
        assert_eq!(config.server.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r#"
capture:
  fps: 10
  backend: synthetic
recording:
  sink: mjpeg
  segment_seconds: 30
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.capture.fps, 10);
        assert_eq!(config.capture.backend, CaptureBackend::Synthetic);
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.recording.sink, SinkBackend::Mjpeg);
        assert_eq!(config.recording.segment_seconds, 30);
        assert_eq!(config.recording.video_codec, "mp4v");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(parse_config("capture:\n  fps: 0\n").is_err());
        assert!(parse_config("recording:\n  video_codec: h264x\n").is_err());
        assert!(parse_config("stream:\n  jpeg_quality: 0\n").is_err());
        assert!(parse_config("server:\n  bind_address: not-an-address\n").is_err());
        assert!(parse_config("capture:\n  backend: firewire\n").is_err());
        assert!(parse_config("recording:\n  filename_timestamp_format: \"%Q\"\n").is_err());
    }

    #[test]
    fn rejects_durations_that_overflow() {
        assert!(parse_config("recording:\n  retention_hours: 18446744073709551615\n").is_err());
        assert!(parse_config("recording:\n  segment_seconds: 18446744073709551615\n").is_err());
        assert!(parse_config("recording:\n  segment_seconds: 86401\n").is_err());

        let config = parse_config("recording:\n  segment_seconds: 86400\n  retention_hours: 8760\n").unwrap();
        assert_eq!(config.recording.segment_duration(), Duration::from_secs(86_400));
        assert_eq!(config.recording.retention_age(), Duration::from_secs(8760 * 3600));
    }

    #[test]
    fn shipped_config_parses() {
        let config = parse_config(include_str!("../config/camwatch.yaml")).unwrap();
        assert_eq!(config.stream.jpeg_quality, 95);
        assert_eq!(config.recording.filename_timestamp_format, "%Y%m%d_%H%M%S");
    }

    #[test]
    fn missing_default_file_falls_back_but_explicit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let missing = missing.to_str().unwrap();
        assert!(load_config(missing, false).is_ok());
        assert!(load_config(missing, true).is_err());
    }
}
