use crate::app_config::ApplicationConfig;
use crate::core::camera_manager::probe_devices;
use crate::operations::op_helper;
use anyhow::{Context, Result};
use log::{info, warn};

/// Reports which device indices open, without starting any pipeline.
pub async fn handle_probe(config: &ApplicationConfig) -> Result<()> {
    let provider = op_helper::build_device_provider(config);
    let probe_limit = config.capture.probe_limit;

    let available = tokio::task::spawn_blocking(move || probe_devices(provider.as_ref(), probe_limit))
        .await
        .context("Device probe task failed")?;

    for index in 0..probe_limit {
        if available.contains(&index) {
            info!("✅ Device index {} is available", index);
        } else {
            info!("❌ Device index {} is unavailable", index);
        }
    }
    if available.len() > config.capture.max_cameras {
        warn!(
            "⚠️ {} devices available but max_cameras is {}; only the first {} would be served.",
            available.len(),
            config.capture.max_cameras,
            config.capture.max_cameras
        );
    }
    info!("🔎 {} of {} probed indices opened.", available.len(), probe_limit);
    Ok(())
}
