//! Pure-Rust segment writer: each segment is a Motion-JPEG elementary stream,
//! i.e. baseline JPEG images written back to back. Needs no video codecs from
//! the host and plays in ffmpeg/VLC.

use crate::core::capture_source::{SegmentSink, SinkFactory};
use crate::core::frame::Frame;
use crate::errors::AppError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const MJPEG_EXTENSION: &str = "mjpeg";

#[derive(Debug, Clone, Copy)]
pub struct MjpegSinkFactory {
    quality: u8,
}

impl MjpegSinkFactory {
    pub fn new(quality: u8) -> Self {
        MjpegSinkFactory { quality }
    }
}

impl SinkFactory for MjpegSinkFactory {
    fn open(&self, path: &Path, _fps: u32, width: u32, height: u32) -> Result<Box<dyn SegmentSink>, AppError> {
        let file = File::create(path).map_err(|e| AppError::Sink {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(Box::new(MjpegSink {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            width,
            height,
            quality: self.quality,
        }))
    }

    fn extension(&self) -> &str {
        MJPEG_EXTENSION
    }
}

pub struct MjpegSink {
    path: PathBuf,
    out: BufWriter<File>,
    width: u32,
    height: u32,
    quality: u8,
}

impl MjpegSink {
    fn sink_err(&self, details: impl Into<String>) -> AppError {
        AppError::Sink {
            path: self.path.clone(),
            details: details.into(),
        }
    }
}

impl SegmentSink for MjpegSink {
    fn append(&mut self, frame: &Frame) -> Result<(), AppError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(self.sink_err(format!(
                "frame is {}x{}, segment is {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }
        let jpeg = frame.encode_jpeg(self.quality)?;
        self.out.write_all(&jpeg).map_err(|e| self.sink_err(e.to_string()))
    }

    fn finalize(self: Box<Self>) -> Result<(), AppError> {
        let path = self.path;
        let file = self.out.into_inner().map_err(|e| AppError::Sink {
            path: path.clone(),
            details: e.error().to_string(),
        })?;
        file.sync_all().map_err(|e| AppError::Sink {
            path,
            details: e.to_string(),
        })
    }
}

/// Splits an MJPEG elementary stream back into its JPEG images.
pub fn split_jpeg_stream(bytes: &[u8]) -> Vec<&[u8]> {
    let mut images = Vec::new();
    let mut start = None;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (0xFF, 0xD8) if start.is_none() => {
                start = Some(i);
                i += 2;
            }
            (0xFF, 0xD9) => {
                if let Some(s) = start.take() {
                    images.push(&bytes[s..i + 2]);
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    images
}
