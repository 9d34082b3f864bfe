use crate::app_config::PipelineSettings;
use crate::camera::capture_loop::CaptureLoop;
use crate::camera::recording_loop::RecordingLoop;
use crate::core::capture_source::{Device, SinkFactory};
use crate::core::frame_buffer::FrameBuffer;
use crate::errors::AppError;
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// One registered camera: its device, frame buffer and the two long-lived
/// capture and recording threads.
pub struct Camera {
    display_id: u32,
    device_index: u32,
    buffer: Arc<FrameBuffer>,
    running: Arc<AtomicBool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Camera {
    /// Configures `device` and starts the capture and recording threads.
    pub fn start(
        display_id: u32,
        device_index: u32,
        mut device: Box<dyn Device>,
        sink_factory: Arc<dyn SinkFactory>,
        settings: PipelineSettings,
    ) -> Result<Self, AppError> {
        if let Err(e) = device.configure(settings.width, settings.height, settings.fps) {
            warn!("⚠️ Camera {} (device {}) rejected configuration: {}", display_id, device_index, e);
        }

        let buffer = Arc::new(FrameBuffer::new());
        let running = Arc::new(AtomicBool::new(true));

        let capture = CaptureLoop::new(
            display_id,
            device,
            Arc::clone(&buffer),
            settings.fps,
            Arc::clone(&running),
        );
        let capture_handle = thread::Builder::new()
            .name(format!("capture-{}", display_id))
            .spawn(move || {
                capture.run();
            })
            .map_err(|e| AppError::Device {
                index: device_index,
                details: format!("failed to spawn capture thread: {}", e),
            })?;

        let recorder = RecordingLoop::new(
            display_id,
            buffer.clone(),
            sink_factory,
            settings,
            Arc::clone(&running),
        );
        let record_handle = match thread::Builder::new()
            .name(format!("record-{}", display_id))
            .spawn(move || {
                recorder.run();
            }) {
            Ok(handle) => handle,
            Err(e) => {
                running.store(false, Ordering::Release);
                if capture_handle.join().is_err() {
                    error!("❌ Camera {} capture thread panicked during startup rollback", display_id);
                }
                return Err(AppError::Device {
                    index: device_index,
                    details: format!("failed to spawn recording thread: {}", e),
                });
            }
        };

        Ok(Camera {
            display_id,
            device_index,
            buffer,
            running,
            workers: Mutex::new(vec![capture_handle, record_handle]),
        })
    }

    pub fn display_id(&self) -> u32 {
        self.display_id
    }

    pub fn device_index(&self) -> u32 {
        self.device_index
    }

    pub fn frame_buffer(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.buffer)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Signals both loops to stop and waits for them. Each loop notices
    /// within one tick; an in-progress segment is finalized first. Calling
    /// this again is a no-op.
    pub fn release(&self) {
        self.running.store(false, Ordering::Release);
        let workers: Vec<JoinHandle<()>> = {
            let mut guard = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            guard.drain(..).collect()
        };
        if workers.is_empty() {
            return;
        }
        for handle in workers {
            let name = handle.thread().name().unwrap_or("camera-worker").to_string();
            if handle.join().is_err() {
                error!("❌ Camera {} thread '{}' panicked", self.display_id, name);
            }
        }
        info!("🔌 Camera {} (device {}) released", self.display_id, self.device_index);
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("display_id", &self.display_id)
            .field("device_index", &self.device_index)
            .field("running", &self.is_running())
            .finish()
    }
}
