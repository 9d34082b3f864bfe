// Shared fakes for the integration tests: scripted devices, in-memory
// segment sinks and scripted frame sources.
#![allow(dead_code)]

use camwatch::app_config::PipelineSettings;
use camwatch::core::capture_source::{Device, DeviceProvider, SegmentSink, SinkFactory};
use camwatch::core::frame::Frame;
use camwatch::core::frame_buffer::FrameSource;
use camwatch::errors::AppError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const WIDTH: u32 = 32;
pub const HEIGHT: u32 = 24;

pub fn settings(output_dir: &Path, fps: u32, segment: Duration) -> PipelineSettings {
    PipelineSettings {
        width: WIDTH,
        height: HEIGHT,
        fps,
        segment_duration: segment,
        retention_age: Duration::from_secs(24 * 3600),
        filename_timestamp_format: "%Y%m%d_%H%M%S".to_string(),
        output_dir: output_dir.to_path_buf(),
    }
}

/// Opens devices only on the listed indices and remembers every attempt.
#[derive(Default)]
pub struct ScriptedProvider {
    openable: BTreeSet<u32>,
    pub attempts: Mutex<Vec<u32>>,
    pub closes: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn new(openable: impl IntoIterator<Item = u32>) -> Self {
        ScriptedProvider {
            openable: openable.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> Vec<u32> {
        self.attempts.lock().unwrap().clone()
    }
}

impl DeviceProvider for ScriptedProvider {
    fn open(&self, index: u32) -> Result<Box<dyn Device>, AppError> {
        self.attempts.lock().unwrap().push(index);
        if self.openable.contains(&index) {
            Ok(Box::new(SolidDevice::new(index as u8, Arc::clone(&self.closes))))
        } else {
            Err(AppError::Device {
                index,
                details: "scripted failure".to_string(),
            })
        }
    }
}

/// Always yields a solid frame of the configured size.
pub struct SolidDevice {
    shade: u8,
    width: u32,
    height: u32,
    closes: Arc<AtomicUsize>,
}

impl SolidDevice {
    pub fn new(shade: u8, closes: Arc<AtomicUsize>) -> Self {
        SolidDevice {
            shade,
            width: WIDTH,
            height: HEIGHT,
            closes,
        }
    }
}

impl Device for SolidDevice {
    fn configure(&mut self, width: u32, height: u32, _fps: u32) -> Result<(), AppError> {
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, AppError> {
        Ok(Frame::solid(self.width, self.height, [self.shade, 90, 180]))
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fails every other read, starting with the first. Successful reads are
/// counted and carry the call number in their blue channel.
pub struct FlakyDevice {
    calls: usize,
    pub successes: Arc<AtomicUsize>,
    pub failures: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl FlakyDevice {
    pub fn new(closes: Arc<AtomicUsize>) -> Self {
        FlakyDevice {
            calls: 0,
            successes: Arc::new(AtomicUsize::new(0)),
            failures: Arc::new(AtomicUsize::new(0)),
            closes,
        }
    }
}

impl Device for FlakyDevice {
    fn configure(&mut self, _width: u32, _height: u32, _fps: u32) -> Result<(), AppError> {
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, AppError> {
        let call = self.calls;
        self.calls += 1;
        if call % 2 == 0 {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(AppError::Device {
                index: 0,
                details: "scripted read failure".to_string(),
            });
        }
        self.successes.fetch_add(1, Ordering::SeqCst);
        Ok(Frame::solid(WIDTH, HEIGHT, [(call % 256) as u8, 0, 0]))
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRecord {
    pub path: PathBuf,
    pub frames: u64,
    pub finalized: bool,
}

/// In-memory sinks. The first `fail_opens` opens fail.
#[derive(Default)]
pub struct CountingSinkFactory {
    fail_opens: AtomicUsize,
    always_fail: bool,
    pub segments: Arc<Mutex<Vec<SegmentRecord>>>,
}

impl CountingSinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(n: usize) -> Self {
        CountingSinkFactory {
            fail_opens: AtomicUsize::new(n),
            ..Default::default()
        }
    }

    pub fn always_failing() -> Self {
        CountingSinkFactory {
            always_fail: true,
            ..Default::default()
        }
    }

    pub fn segments(&self) -> Vec<SegmentRecord> {
        self.segments.lock().unwrap().clone()
    }
}

impl SinkFactory for CountingSinkFactory {
    fn open(&self, path: &Path, _fps: u32, _width: u32, _height: u32) -> Result<Box<dyn SegmentSink>, AppError> {
        let scripted_failure = self
            .fail_opens
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if self.always_fail || scripted_failure {
            return Err(AppError::Sink {
                path: path.to_path_buf(),
                details: "scripted open failure".to_string(),
            });
        }
        let mut segments = self.segments.lock().unwrap();
        segments.push(SegmentRecord {
            path: path.to_path_buf(),
            frames: 0,
            finalized: false,
        });
        Ok(Box::new(CountingSink {
            slot: segments.len() - 1,
            segments: Arc::clone(&self.segments),
        }))
    }

    fn extension(&self) -> &str {
        "test"
    }
}

struct CountingSink {
    slot: usize,
    segments: Arc<Mutex<Vec<SegmentRecord>>>,
}

impl SegmentSink for CountingSink {
    fn append(&mut self, _frame: &Frame) -> Result<(), AppError> {
        self.segments.lock().unwrap()[self.slot].frames += 1;
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<(), AppError> {
        self.segments.lock().unwrap()[self.slot].finalized = true;
        Ok(())
    }
}

/// Frame source driven by a per-call script. `script(n)` decides what the
/// n-th read returns.
pub struct ScriptedSource<F> {
    calls: AtomicUsize,
    script: F,
}

impl<F> ScriptedSource<F>
where
    F: Fn(usize) -> Option<Frame> + Send + Sync,
{
    pub fn new(script: F) -> Self {
        ScriptedSource {
            calls: AtomicUsize::new(0),
            script,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<F> FrameSource for ScriptedSource<F>
where
    F: Fn(usize) -> Option<Frame> + Send + Sync,
{
    fn latest(&self) -> Option<Frame> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(n)
    }
}

pub fn solid() -> Frame {
    Frame::solid(WIDTH, HEIGHT, [20, 40, 60])
}
