//! Collaborator seams: the capture device and the segment writer.

use crate::core::frame::Frame;
use crate::errors::AppError;
use std::path::Path;

/// Opens physical capture devices by index.
pub trait DeviceProvider: Send + Sync {
    fn open(&self, index: u32) -> Result<Box<dyn Device>, AppError>;
}

/// An open capture device handle.
pub trait Device: Send {
    fn configure(&mut self, width: u32, height: u32, fps: u32) -> Result<(), AppError>;

    /// Reads the next frame. Failures are transient; callers retry on the
    /// next tick.
    fn read_frame(&mut self) -> Result<Frame, AppError>;

    fn close(&mut self);
}

/// Opens segment writers for the recording loop.
pub trait SinkFactory: Send + Sync {
    fn open(&self, path: &Path, fps: u32, width: u32, height: u32) -> Result<Box<dyn SegmentSink>, AppError>;

    /// File extension of the segments this factory writes, without the dot.
    fn extension(&self) -> &str;
}

/// An open, time-boxed output file.
pub trait SegmentSink: Send {
    fn append(&mut self, frame: &Frame) -> Result<(), AppError>;

    /// Flushes and closes the file. The segment is immutable afterwards.
    fn finalize(self: Box<Self>) -> Result<(), AppError>;
}
