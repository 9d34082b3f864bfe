//! OpenCV-backed device and segment writer.

use crate::app_config::ApiPreference;
use crate::core::capture_source::{Device, DeviceProvider, SegmentSink, SinkFactory};
use crate::core::frame::Frame;
use crate::errors::AppError;
use log::{debug, info, warn};
use opencv::{
    core::{self as opencv_core, Mat, Scalar, Size},
    imgproc,
    prelude::*,
    videoio,
};
use std::path::{Path, PathBuf};

fn api_preference_code(preference: ApiPreference) -> i32 {
    match preference {
        ApiPreference::Any => videoio::CAP_ANY,
        ApiPreference::Dshow => videoio::CAP_DSHOW,
        ApiPreference::Msmf => videoio::CAP_MSMF,
        ApiPreference::V4l2 => videoio::CAP_V4L2,
        ApiPreference::AvFoundation => videoio::CAP_AVFOUNDATION,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OpenCvDeviceProvider {
    api_preference: ApiPreference,
}

impl OpenCvDeviceProvider {
    pub fn new(api_preference: ApiPreference) -> Self {
        OpenCvDeviceProvider { api_preference }
    }
}

impl DeviceProvider for OpenCvDeviceProvider {
    fn open(&self, index: u32) -> Result<Box<dyn Device>, AppError> {
        let cap = videoio::VideoCapture::new(index as i32, api_preference_code(self.api_preference))
            .map_err(|e| AppError::Device {
                index,
                details: format!("OpenCV: VideoCapture creation failed: {}", e),
            })?;
        let opened = videoio::VideoCapture::is_opened(&cap).map_err(|e| AppError::Device {
            index,
            details: format!("OpenCV: is_opened check failed: {}", e),
        })?;
        if !opened {
            return Err(AppError::Device {
                index,
                details: "device did not open".to_string(),
            });
        }
        debug!("👍 OpenCV device {} opened ({:?})", index, self.api_preference);
        Ok(Box::new(OpenCvDevice {
            index,
            cap,
            target: None,
            raw: Mat::default(),
            resized: Mat::default(),
            closed: false,
        }))
    }
}

pub struct OpenCvDevice {
    index: u32,
    cap: videoio::VideoCapture,
    target: Option<Size>,
    raw: Mat,
    resized: Mat,
    closed: bool,
}

impl OpenCvDevice {
    fn device_err(&self, details: impl Into<String>) -> AppError {
        AppError::Device {
            index: self.index,
            details: details.into(),
        }
    }
}

impl Device for OpenCvDevice {
    fn configure(&mut self, width: u32, height: u32, fps: u32) -> Result<(), AppError> {
        self.target = Some(Size::new(width as i32, height as i32));
        let requests = [
            (videoio::CAP_PROP_FRAME_WIDTH, f64::from(width), "width"),
            (videoio::CAP_PROP_FRAME_HEIGHT, f64::from(height), "height"),
            (videoio::CAP_PROP_FPS, f64::from(fps), "fps"),
        ];
        for (prop, value, label) in requests {
            // Drivers are free to ignore these; frames are resized on read.
            if !self.cap.set(prop, value)? {
                debug!("OpenCV device {} ignored {} = {}", self.index, label, value);
            }
        }
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, AppError> {
        if !self.cap.read(&mut self.raw)? {
            return Err(self.device_err("read returned no frame"));
        }
        if self.raw.empty() {
            return Err(self.device_err("read an empty frame"));
        }
        if self.raw.typ() != opencv_core::CV_8UC3 {
            return Err(self.device_err(format!("unexpected pixel type {}", self.raw.typ())));
        }

        let needs_resize = match self.target {
            Some(target) => self.raw.size()? != target,
            None => false,
        };
        if let (true, Some(target)) = (needs_resize, self.target) {
            imgproc::resize(&self.raw, &mut self.resized, target, 0.0, 0.0, imgproc::INTER_LINEAR)?;
            mat_to_frame(&self.resized)
        } else {
            mat_to_frame(&self.raw)
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.cap.release() {
            warn!("⚠️ OpenCV device {} release failed: {}", self.index, e);
        }
    }
}

fn mat_to_frame(mat: &Mat) -> Result<Frame, AppError> {
    let width = mat.cols() as u32;
    let height = mat.rows() as u32;
    let bytes = if mat.is_continuous() {
        mat.data_bytes()?.to_vec()
    } else {
        mat.try_clone()?.data_bytes()?.to_vec()
    };
    Frame::from_bgr(width, height, bytes)
}

/// Writes segments through `videoio::VideoWriter`.
#[derive(Debug, Clone)]
pub struct OpenCvSinkFactory {
    fourcc: i32,
    extension: String,
}

impl OpenCvSinkFactory {
    /// `codec` is a four character code such as `mp4v` or `MJPG`; `format`
    /// is the container extension.
    pub fn new(codec: &str, format: &str) -> Result<Self, AppError> {
        let chars: Vec<char> = codec.chars().collect();
        if chars.len() != 4 {
            return Err(AppError::Config(format!("video codec '{}' is not a FOURCC", codec)));
        }
        let fourcc = videoio::VideoWriter::fourcc(chars[0], chars[1], chars[2], chars[3])?;
        info!("🎞️ OpenCV segment writer using codec '{}' in .{} containers", codec, format);
        Ok(OpenCvSinkFactory {
            fourcc,
            extension: format.to_string(),
        })
    }
}

impl SinkFactory for OpenCvSinkFactory {
    fn open(&self, path: &Path, fps: u32, width: u32, height: u32) -> Result<Box<dyn SegmentSink>, AppError> {
        let sink_err = |details: String| AppError::Sink {
            path: path.to_path_buf(),
            details,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| sink_err("path is not valid UTF-8".to_string()))?;
        let writer = videoio::VideoWriter::new(
            path_str,
            self.fourcc,
            f64::from(fps),
            Size::new(width as i32, height as i32),
            true,
        )
        .map_err(|e| sink_err(format!("OpenCV: VideoWriter creation failed: {}", e)))?;

        let opened = videoio::VideoWriter::is_opened(&writer)
            .map_err(|e| sink_err(format!("OpenCV: is_opened check failed: {}", e)))?;
        if !opened {
            return Err(sink_err("VideoWriter did not open".to_string()));
        }

        let scratch = Mat::new_rows_cols_with_default(
            height as i32,
            width as i32,
            opencv_core::CV_8UC3,
            Scalar::all(0.0),
        )?;
        Ok(Box::new(OpenCvSink {
            path: path.to_path_buf(),
            writer,
            scratch,
        }))
    }

    fn extension(&self) -> &str {
        &self.extension
    }
}

pub struct OpenCvSink {
    path: PathBuf,
    writer: videoio::VideoWriter,
    scratch: Mat,
}

impl SegmentSink for OpenCvSink {
    fn append(&mut self, frame: &Frame) -> Result<(), AppError> {
        if frame.width() as i32 != self.scratch.cols() || frame.height() as i32 != self.scratch.rows() {
            return Err(AppError::Sink {
                path: self.path.clone(),
                details: format!(
                    "frame is {}x{}, segment is {}x{}",
                    frame.width(),
                    frame.height(),
                    self.scratch.cols(),
                    self.scratch.rows()
                ),
            });
        }
        self.scratch.data_bytes_mut()?.copy_from_slice(frame.data());
        self.writer.write(&self.scratch)?;
        Ok(())
    }

    fn finalize(mut self: Box<Self>) -> Result<(), AppError> {
        self.writer.release().map_err(|e| AppError::Sink {
            path: self.path.clone(),
            details: format!("OpenCV: VideoWriter release failed: {}", e),
        })
    }
}
