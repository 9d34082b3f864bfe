//! Deletes recorded segments once they age past the retention window.

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Outcome of one sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: Vec<PathBuf>,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct RetentionSweeper {
    max_age: Duration,
}

impl RetentionSweeper {
    pub fn new(max_age: Duration) -> Self {
        RetentionSweeper { max_age }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Removes regular files in `dir` last modified more than `max_age` ago.
    pub fn sweep(&self, dir: &Path) -> SweepReport {
        let cutoff = SystemTime::now()
            .checked_sub(self.max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        sweep_before(dir, cutoff)
    }
}

/// Removes every regular file directly inside `dir` whose modification time
/// is strictly earlier than `cutoff`. Subdirectories are neither entered nor
/// removed. A failure on one entry is logged and the sweep moves on.
pub fn sweep_before(dir: &Path, cutoff: SystemTime) -> SweepReport {
    let mut report = SweepReport::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("⚠️ Retention sweep could not list '{}': {}", dir.display(), e);
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("⚠️ Retention sweep skipped an unreadable entry in '{}': {}", dir.display(), e);
                report.failed += 1;
                continue;
            }
        };
        let path = entry.path();

        // entry.metadata() does not follow symlinks, so links are left alone.
        let modified = match entry.metadata() {
            Ok(meta) if meta.is_file() => meta.modified(),
            Ok(_) => continue,
            Err(e) => {
                warn!("⚠️ Could not stat '{}': {}", path.display(), e);
                report.failed += 1;
                continue;
            }
        };
        let modified = match modified {
            Ok(t) => t,
            Err(e) => {
                warn!("⚠️ No modification time for '{}': {}", path.display(), e);
                report.failed += 1;
                continue;
            }
        };

        if modified >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("🗑️ Removed expired segment {}", path.display());
                report.removed.push(path);
            }
            Err(e) => {
                warn!("⚠️ Failed to delete expired segment '{}': {}", path.display(), e);
                report.failed += 1;
            }
        }
    }

    if !report.removed.is_empty() {
        info!("🧹 Retention sweep removed {} file(s) from {}", report.removed.len(), dir.display());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(path: &Path, modified: SystemTime) {
        let file = File::create(path).unwrap();
        file.set_modified(modified).unwrap();
    }

    #[test]
    fn removes_exactly_the_files_older_than_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        let cutoff = now - Duration::from_secs(3600);

        let old = dir.path().join("1_old.mp4");
        let at_cutoff = dir.path().join("1_edge.mp4");
        let fresh = dir.path().join("2_fresh.mp4");
        touch(&old, cutoff - Duration::from_secs(1));
        touch(&at_cutoff, cutoff);
        touch(&fresh, now);

        let report = sweep_before(dir.path(), cutoff);
        assert_eq!(report.removed, vec![old.clone()]);
        assert_eq!(report.failed, 0);
        assert!(!old.exists());
        assert!(at_cutoff.exists());
        assert!(fresh.exists());

        let second = sweep_before(dir.path(), cutoff);
        assert_eq!(second, SweepReport::default());
        assert!(at_cutoff.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn leaves_subdirectories_alone() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        let inner = sub.join("ancient.mp4");
        touch(&inner, SystemTime::UNIX_EPOCH + Duration::from_secs(10));

        let report = sweep_before(dir.path(), SystemTime::now());
        assert!(report.removed.is_empty());
        assert!(sub.is_dir());
        assert!(inner.exists());
    }

    #[test]
    fn missing_directory_is_an_empty_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let report = sweep_before(&dir.path().join("gone"), SystemTime::now());
        assert_eq!(report, SweepReport::default());
    }

    #[test]
    fn sweeper_uses_max_age_from_now() {
        let dir = tempfile::tempdir().unwrap();
        let day = Duration::from_secs(24 * 3600);
        let expired = dir.path().join("1_expired.mp4");
        let recent = dir.path().join("1_recent.mp4");
        touch(&expired, SystemTime::now() - day - Duration::from_secs(60));
        touch(&recent, SystemTime::now() - Duration::from_secs(60));

        let report = RetentionSweeper::new(day).sweep(dir.path());
        assert_eq!(report.removed, vec![expired]);
        assert!(recent.exists());
    }
}
