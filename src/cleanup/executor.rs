use std::fs;
use std::path::Path;

use super::item::{CleanupItem, CleanupOutcome};
use super::trash::{HomeTrash, TrashBin};
use super::walk;

/// Applies trash or delete operations to scan results.
///
/// Failures never abort a batch: the failing entry is skipped, counted in
/// [`CleanupOutcome::skipped`], and the loop moves on.
pub struct CleanupExecutor {
    trash: Box<dyn TrashBin>,
}

impl Default for CleanupExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanupExecutor {
    pub fn new() -> Self {
        Self::with_trash(HomeTrash)
    }

    pub fn with_trash(trash: impl TrashBin + 'static) -> Self {
        CleanupExecutor {
            trash: Box::new(trash),
        }
    }

    pub fn move_to_trash(&self, items: &[CleanupItem]) -> CleanupOutcome {
        let _span = tracing::debug_span!("executor.move_to_trash").entered();

        let mut outcome = CleanupOutcome::default();
        for item in items {
            match self.trash.trash(&item.path) {
                Ok(destination) => {
                    tracing::debug!(
                        path = %item.path.display(),
                        destination = %destination.display(),
                        "moved to trash"
                    );
                    outcome.record_removed(item.size_bytes);
                }
                Err(err) => {
                    tracing::debug!(%err, "trash failed, skipping");
                    outcome.record_skipped();
                }
            }
        }
        log_skipped("move_to_trash", &outcome);
        outcome
    }

    /// Permanently deletes `items`, or only totals them when `dry_run` is set.
    ///
    /// Directory items are emptied but kept: caches and log folders must stay
    /// in place for the OS and applications to repopulate. File items are
    /// removed outright.
    pub fn cleanup(&self, items: &[CleanupItem], dry_run: bool) -> CleanupOutcome {
        let _span = tracing::debug_span!("executor.cleanup", dry_run).entered();

        let mut outcome = CleanupOutcome::default();
        if dry_run {
            outcome.bytes_freed = items.iter().map(|item| item.size_bytes).sum();
            return outcome;
        }

        for item in items {
            // A symlink to a directory stands for that directory; the link stays.
            let meta = fs::metadata(&item.path).or_else(|_| fs::symlink_metadata(&item.path));
            let Ok(meta) = meta else {
                outcome.record_skipped();
                continue;
            };
            if meta.is_dir() {
                empty_directory(&item.path, &mut outcome);
            } else {
                match fs::remove_file(&item.path) {
                    Ok(()) => outcome.record_removed(item.size_bytes),
                    Err(err) => {
                        tracing::debug!(path = %item.path.display(), %err, "delete failed");
                        outcome.record_skipped();
                    }
                }
            }
        }
        log_skipped("cleanup", &outcome);
        outcome
    }
}

fn empty_directory(dir: &Path, outcome: &mut CleanupOutcome) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %dir.display(), %err, "cannot list directory");
            outcome.record_skipped();
            return;
        }
    };

    for entry in entries {
        let Ok(entry) = entry else {
            outcome.record_skipped();
            continue;
        };
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            outcome.record_skipped();
            continue;
        };

        let (size, result) = if file_type.is_dir() {
            (walk::total_size(&path), fs::remove_dir_all(&path))
        } else {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            (size, fs::remove_file(&path))
        };

        match result {
            Ok(()) => outcome.record_removed(size),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "delete failed");
                outcome.record_skipped();
            }
        }
    }
}

fn log_skipped(operation: &str, outcome: &CleanupOutcome) {
    if outcome.skipped > 0 {
        tracing::warn!(
            operation,
            skipped = outcome.skipped,
            removed = outcome.removed,
            bytes_freed = outcome.bytes_freed,
            "some entries could not be removed"
        );
    }
}
