use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Longest accepted segment, one day.
pub const MAX_SEGMENT_SECONDS: u64 = 24 * 3600;
pub const SECONDS_PER_HOUR: u64 = 3600;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaptureBackend {
    OpenCv,
    Synthetic,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiPreference {
    Any,
    Dshow,
    Msmf,
    V4l2,
    AvFoundation,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    OpenCv,
    Mjpeg,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub max_cameras: usize,
    pub probe_limit: u32, // indices 0..probe_limit are probed
    pub backend: CaptureBackend,
    pub api_preference: ApiPreference,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        CaptureSettings {
            width: 640,
            height: 480,
            fps: 20,
            max_cameras: 4,
            probe_limit: 4,
            backend: CaptureBackend::OpenCv,
            api_preference: ApiPreference::Any,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RecordingSettings {
    pub output_directory: String, // relative paths resolve against the executable's directory
    pub segment_seconds: u64,
    pub retention_hours: u64,
    pub sink: SinkBackend,
    pub video_format: String, // container extension, e.g. "mp4", "avi"
    pub video_codec: String,  // FOURCC, e.g. "mp4v", "MJPG"
    pub filename_timestamp_format: String, // strftime format string
}

impl Default for RecordingSettings {
    fn default() -> Self {
        RecordingSettings {
            output_directory: "save".to_string(),
            segment_seconds: 60,
            retention_hours: 24,
            sink: SinkBackend::OpenCv,
            video_format: "mp4".to_string(),
            video_codec: "mp4v".to_string(),
            filename_timestamp_format: "%Y%m%d_%H%M%S".to_string(),
        }
    }
}

impl RecordingSettings {
    pub fn segment_duration(&self) -> Duration {
        Duration::from_secs(self.segment_seconds)
    }

    /// Saturates rather than overflowing; `validate_config` rejects hour
    /// counts whose seconds do not fit.
    pub fn retention_age(&self) -> Duration {
        Duration::from_secs(self.retention_hours.saturating_mul(SECONDS_PER_HOUR))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StreamSettings {
    pub jpeg_quality: u8,
}

impl Default for StreamSettings {
    fn default() -> Self {
        StreamSettings { jpeg_quality: 95 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApplicationConfig {
    pub capture: CaptureSettings,
    pub recording: RecordingSettings,
    pub stream: StreamSettings,
    pub server: ServerSettings,
    pub log_level: Option<String>, // CLI --debug takes precedence
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            capture: CaptureSettings::default(),
            recording: RecordingSettings::default(),
            stream: StreamSettings::default(),
            server: ServerSettings::default(),
            log_level: Some("info".to_string()),
        }
    }
}

impl ApplicationConfig {
    /// Flattens the settings one camera pipeline needs, with the output
    /// directory already resolved.
    pub fn pipeline_settings(&self, output_dir: PathBuf) -> PipelineSettings {
        PipelineSettings {
            width: self.capture.width,
            height: self.capture.height,
            fps: self.capture.fps,
            segment_duration: self.recording.segment_duration(),
            retention_age: self.recording.retention_age(),
            filename_timestamp_format: self.recording.filename_timestamp_format.clone(),
            output_dir,
        }
    }
}

/// Per-camera pipeline parameters shared by the capture and recording loops.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub segment_duration: Duration,
    pub retention_age: Duration,
    pub filename_timestamp_format: String,
    pub output_dir: PathBuf,
}
