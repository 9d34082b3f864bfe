use crate::common::timestamp_utils;
use crate::errors::AppError;
use log::debug;
use std::path::{Path, PathBuf};

/// Builds `{display_id}_{timestamp}.{extension}` using the current local time.
pub fn generate_segment_filename(
    display_id: u32,
    timestamp_format: &str, // from config, e.g., "%Y%m%d_%H%M%S"
    extension: &str,        // e.g., "mp4", "mjpeg"
) -> String {
    let timestamp = timestamp_utils::current_local_timestamp_str(timestamp_format);
    format!("{}_{}.{}", display_id, timestamp, extension)
}

/// Resolves a configured output directory. Relative paths are anchored at the
/// directory holding the running executable; if that cannot be determined the
/// working directory is used.
pub fn resolve_output_directory(configured: &str) -> PathBuf {
    let path = PathBuf::from(configured);
    if path.is_absolute() {
        return path;
    }
    match std::env::current_exe() {
        Ok(exe) => match exe.parent() {
            Some(dir) => dir.join(path),
            None => path,
        },
        Err(e) => {
            debug!("Could not locate executable ({}), resolving '{}' against the working directory.", e, configured);
            path
        }
    }
}

pub fn ensure_output_directory(dir_path: &Path) -> Result<PathBuf, AppError> {
    if !dir_path.exists() {
        debug!("Output directory '{}' does not exist, attempting to create it.", dir_path.display());
        std::fs::create_dir_all(dir_path).map_err(|e| {
            AppError::Io(format!(
                "Failed to create output directory '{}': {}",
                dir_path.display(),
                e
            ))
        })?;
    } else if !dir_path.is_dir() {
        return Err(AppError::Io(format!(
            "Output path '{}' exists but is not a directory.",
            dir_path.display()
        )));
    }
    Ok(dir_path.to_path_buf())
}
