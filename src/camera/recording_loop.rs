//! Consumer that turns a camera's frame buffer into rolling, time-boxed
//! segment files, sweeping expired ones before each new segment.

use crate::app_config::PipelineSettings;
use crate::common::file_utils;
use crate::core::capture_source::SinkFactory;
use crate::core::frame_buffer::FrameSource;
use crate::core::pacing::Ticker;
use crate::core::retention::RetentionSweeper;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// A segment was written and finalized.
    Recorded { path: PathBuf, frames: u64 },
    /// The sink could not be opened; the loop already waited out one
    /// segment duration.
    OpenFailed { path: PathBuf },
    /// The running flag was cleared before a segment started.
    Stopped,
}

pub struct RecordingLoop {
    display_id: u32,
    source: Arc<dyn FrameSource>,
    sink_factory: Arc<dyn SinkFactory>,
    settings: PipelineSettings,
    sweeper: RetentionSweeper,
    running: Arc<AtomicBool>,
}

impl RecordingLoop {
    pub fn new(
        display_id: u32,
        source: Arc<dyn FrameSource>,
        sink_factory: Arc<dyn SinkFactory>,
        settings: PipelineSettings,
        running: Arc<AtomicBool>,
    ) -> Self {
        let sweeper = RetentionSweeper::new(settings.retention_age);
        RecordingLoop {
            display_id,
            source,
            sink_factory,
            settings,
            sweeper,
            running,
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Records segments back to back until the running flag clears. Returns
    /// the number of segments finalized.
    pub fn run(&self) -> u64 {
        debug!("🎬 Camera {} recording loop started", self.display_id);
        let mut finalized = 0u64;
        while self.is_running() {
            if let SegmentOutcome::Recorded { .. } = self.record_segment() {
                finalized += 1;
            }
        }
        info!("⏹️ Camera {} recording stopped after {} segment(s)", self.display_id, finalized);
        finalized
    }

    /// One outer iteration: sweep, open, fill for one segment duration,
    /// finalize.
    pub fn record_segment(&self) -> SegmentOutcome {
        if !self.is_running() {
            return SegmentOutcome::Stopped;
        }

        self.sweeper.sweep(&self.settings.output_dir);

        let filename = file_utils::generate_segment_filename(
            self.display_id,
            &self.settings.filename_timestamp_format,
            self.sink_factory.extension(),
        );
        let path = self.settings.output_dir.join(filename);

        let mut sink = match self.sink_factory.open(
            &path,
            self.settings.fps,
            self.settings.width,
            self.settings.height,
        ) {
            Ok(sink) => sink,
            Err(e) => {
                warn!("⚠️ Camera {} segment writer open failed for {}: {}", self.display_id, path.display(), e);
                self.back_off();
                return SegmentOutcome::OpenFailed { path };
            }
        };
        debug!("✍️ Camera {} writing segment {}", self.display_id, path.display());

        let started = Instant::now();
        let mut ticker = Ticker::from_fps(self.settings.fps);
        let mut frames = 0u64;

        // Wall-clock bounded: a slow camera yields a sparser file, never a
        // longer one.
        while started.elapsed() < self.settings.segment_duration && self.is_running() {
            if let Some(frame) = self.source.latest() {
                match sink.append(&frame) {
                    Ok(()) => frames += 1,
                    Err(e) => debug!("Camera {} dropped a frame from {}: {}", self.display_id, path.display(), e),
                }
            }
            ticker.wait();
        }

        if let Err(e) = sink.finalize() {
            warn!("⚠️ Camera {} failed to finalize {}: {}", self.display_id, path.display(), e);
        }
        info!("✅ Camera {} segment complete: {} ({} frames)", self.display_id, path.display(), frames);
        SegmentOutcome::Recorded { path, frames }
    }

    // Waits one full segment duration, but notices a release within a tick.
    // A duration past the end of the clock waits for the release alone.
    fn back_off(&self) {
        let deadline = Instant::now().checked_add(self.settings.segment_duration);
        let mut ticker = Ticker::from_fps(self.settings.fps);
        while self.is_running() && deadline.map_or(true, |d| Instant::now() < d) {
            ticker.wait();
        }
    }
}
