use crate::core::capture_source::Device;
use crate::core::frame_buffer::FrameBuffer;
use crate::core::pacing::Ticker;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Producer side of a camera pipeline: pulls frames from the device at the
/// target rate and publishes each one into the frame buffer.
pub struct CaptureLoop {
    display_id: u32,
    device: Box<dyn Device>,
    buffer: Arc<FrameBuffer>,
    fps: u32,
    running: Arc<AtomicBool>,
}

impl CaptureLoop {
    pub fn new(
        display_id: u32,
        device: Box<dyn Device>,
        buffer: Arc<FrameBuffer>,
        fps: u32,
        running: Arc<AtomicBool>,
    ) -> Self {
        CaptureLoop {
            display_id,
            device,
            buffer,
            fps,
            running,
        }
    }

    /// Runs until the running flag clears, then closes the device. Returns
    /// the number of frames published.
    pub fn run(mut self) -> u64 {
        debug!("🎥 Camera {} capture loop started at {} fps", self.display_id, self.fps);
        let mut ticker = Ticker::from_fps(self.fps);
        let mut published = 0u64;
        let mut failed = 0u64;

        while self.running.load(Ordering::Acquire) {
            match self.device.read_frame() {
                Ok(frame) => {
                    self.buffer.publish(frame);
                    published += 1;
                }
                Err(e) => {
                    failed += 1;
                    debug!("Camera {} frame read failed, skipping tick: {}", self.display_id, e);
                }
            }
            ticker.wait();
        }

        self.device.close();
        info!(
            "⏹️ Camera {} capture stopped ({} frames published, {} failed reads)",
            self.display_id, published, failed
        );
        published
    }
}
