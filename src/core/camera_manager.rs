use crate::app_config::PipelineSettings;
use crate::camera::camera_entity::Camera;
use crate::core::capture_source::{DeviceProvider, SinkFactory};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Active camera pipelines keyed by display identifier. Built once at
/// startup and never modified afterwards.
#[derive(Debug, Default)]
pub struct CameraRegistry {
    cameras: BTreeMap<u32, Camera>,
}

impl CameraRegistry {
    /// Probes device indices `0..probe_limit` and starts a pipeline for each
    /// one that opens, until `max_cameras` are running. Display identifiers
    /// are assigned sequentially from 1. Indices that fail are never retried.
    pub fn probe(
        provider: &dyn DeviceProvider,
        sink_factory: Arc<dyn SinkFactory>,
        settings: &PipelineSettings,
        probe_limit: u32,
        max_cameras: usize,
    ) -> Self {
        debug!("🛠️ Probing camera indices 0..{} (max {} cameras)...", probe_limit, max_cameras);
        let start_time = Instant::now();
        let mut cameras = BTreeMap::new();
        let mut next_display_id = 1u32;

        for index in 0..probe_limit {
            if cameras.len() >= max_cameras {
                debug!("  Reached max camera count, stopping probe at index {}", index);
                break;
            }

            match provider.open(index) {
                Ok(mut probe_handle) => probe_handle.close(),
                Err(e) => {
                    info!("❌ Camera index {} is unavailable: {}", index, e);
                    continue;
                }
            }

            let device = match provider.open(index) {
                Ok(device) => device,
                Err(e) => {
                    warn!("⚠️ Camera index {} opened for probing but not for capture: {}", index, e);
                    continue;
                }
            };

            match Camera::start(next_display_id, index, device, Arc::clone(&sink_factory), settings.clone()) {
                Ok(camera) => {
                    info!("✅ Camera {} initialized from device index {}", next_display_id, index);
                    cameras.insert(next_display_id, camera);
                    next_display_id += 1;
                }
                Err(e) => {
                    error!("❌ Camera index {} could not start its pipeline: {}", index, e);
                }
            }
        }

        info!("📷 {} camera(s) registered in {:?}", cameras.len(), start_time.elapsed());
        CameraRegistry { cameras }
    }

    pub fn lookup(&self, display_id: u32) -> Option<&Camera> {
        self.cameras.get(&display_id)
    }

    /// Display identifiers in ascending order.
    pub fn display_ids(&self) -> Vec<u32> {
        self.cameras.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Stops every pipeline and closes every device.
    pub fn release_all(&self) {
        debug!("Releasing {} camera(s)...", self.cameras.len());
        for camera in self.cameras.values() {
            camera.release();
        }
    }
}

/// Opens and immediately closes each index in `0..probe_limit`, returning
/// those that opened. Starts nothing.
pub fn probe_devices(provider: &dyn DeviceProvider, probe_limit: u32) -> Vec<u32> {
    (0..probe_limit)
        .filter(|&index| match provider.open(index) {
            Ok(mut handle) => {
                handle.close();
                true
            }
            Err(e) => {
                debug!("Device index {} did not open: {}", index, e);
                false
            }
        })
        .collect()
}
