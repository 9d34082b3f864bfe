use crate::app_config::ApplicationConfig;
use crate::common::{file_utils, timestamp_utils};
use crate::core::retention::RetentionSweeper;
use anyhow::{Context, Result};
use log::info;
use std::time::SystemTime;

/// Runs the retention sweep once against the output directory.
pub async fn handle_sweep(config: &ApplicationConfig) -> Result<()> {
    let dir = file_utils::resolve_output_directory(&config.recording.output_directory);
    if !dir.is_dir() {
        info!("ℹ️ Output directory {} does not exist, nothing to sweep.", dir.display());
        return Ok(());
    }

    let sweeper = RetentionSweeper::new(config.recording.retention_age());
    if let Some(cutoff) = SystemTime::now().checked_sub(sweeper.max_age()) {
        info!(
            "🧹 Removing segments last modified before {}",
            timestamp_utils::format_local(cutoff, "%Y-%m-%d %H:%M:%S")
        );
    }
    let sweep_dir = dir.clone();
    let report = tokio::task::spawn_blocking(move || sweeper.sweep(&sweep_dir))
        .await
        .context("Retention sweep task failed")?;

    for path in &report.removed {
        info!("  -> removed {}", path.display());
    }
    info!(
        "🧹 Swept {}: {} removed, {} failed (retention {:?}).",
        dir.display(),
        report.removed.len(),
        report.failed,
        sweeper.max_age()
    );
    Ok(())
}
