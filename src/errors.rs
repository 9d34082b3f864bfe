use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("File I/O Error: {0}")]
    Io(String),

    #[error("Device Error on index {index}: {details}")]
    Device { index: u32, details: String },

    #[error("Sink Error for '{}': {details}", path.display())]
    Sink { path: PathBuf, details: String },

    #[error("Encode Error: {0}")]
    Encode(String),

    #[error("OpenCV Error: {0}")]
    OpenCV(String),
}

// Allow conversion from std::io::Error to AppError::Io
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<opencv::Error> for AppError {
    fn from(err: opencv::Error) -> Self {
        AppError::OpenCV(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Encode(err.to_string())
    }
}
