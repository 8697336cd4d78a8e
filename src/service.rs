use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cleanup::{
    CleanupCatalog, CleanupCategory, CleanupExecutor, CleanupItem, CleanupOutcome,
    CleanupScanner, ScanSummary,
};
use crate::config::Config;
use crate::system::history::HistoryBuffer;
use crate::system::sampler::MetricSampler;
use crate::system::snapshot::{CpuSample, DiskStats, MemorySnapshot, Readings};

/// Composition root for telemetry and cleanup.
///
/// The owner drives refreshes by calling [`TelemetryService::tick`], usually
/// from an [`crate::event::EventHandler`] tick. Scans hand results back to the
/// caller; the service only keeps the latest readings and the CPU history.
pub struct TelemetryService {
    sampler: MetricSampler,
    history: HistoryBuffer,
    readings: Readings,
    disk_path: PathBuf,
    scanner: Arc<CleanupScanner>,
    executor: CleanupExecutor,
    large_scan_running: AtomicBool,
}

/// Clears the large-scan flag when the scan finishes or its future is dropped.
struct ScanFlagGuard<'a>(&'a AtomicBool);

impl Drop for ScanFlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TelemetryService {
    pub fn new(config: &Config) -> Self {
        let scanner = CleanupScanner::new(
            CleanupCatalog::new(),
            config.cleanup.large_file_roots.clone(),
        );
        Self::with_parts(
            scanner,
            CleanupExecutor::new(),
            config.general.history_length,
            &config.general.disk_path,
        )
    }

    pub fn with_parts(
        scanner: CleanupScanner,
        executor: CleanupExecutor,
        history_length: usize,
        disk_path: impl AsRef<Path>,
    ) -> Self {
        TelemetryService {
            sampler: MetricSampler::new(),
            history: HistoryBuffer::new(history_length),
            readings: Readings::default(),
            disk_path: disk_path.as_ref().to_path_buf(),
            scanner: Arc::new(scanner),
            executor,
            large_scan_running: AtomicBool::new(false),
        }
    }

    /// One refresh: sample everything, record CPU history, publish readings.
    pub fn tick(&mut self) -> &Readings {
        let readings = self.sampler.sample(&self.disk_path);
        self.history.push(readings.cpu);
        self.readings = readings;
        &self.readings
    }

    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn current_cpu(&self) -> CpuSample {
        self.readings.cpu
    }

    pub fn current_memory(&self) -> MemorySnapshot {
        self.readings.memory
    }

    pub fn current_disk(&self) -> DiskStats {
        self.readings.disk
    }

    pub fn cpu_history(&self) -> Vec<f64> {
        self.history.values()
    }

    pub fn scanner(&self) -> &CleanupScanner {
        &self.scanner
    }

    /// Category scan on the blocking pool.
    pub async fn scan_categories(&self, categories: Vec<CleanupCategory>) -> Vec<CleanupItem> {
        let scanner = Arc::clone(&self.scanner);
        tokio::task::spawn_blocking(move || scanner.scan(&categories))
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "category scan task failed");
                Vec::new()
            })
    }

    /// Sizes of the standard categories and of Downloads.
    pub async fn scan_overview(&self) -> ScanSummary {
        let standard = self
            .scan_categories(CleanupCategory::STANDARD.to_vec())
            .await;
        let downloads = self
            .scan_categories(vec![CleanupCategory::Downloads])
            .await;
        ScanSummary {
            standard,
            downloads,
        }
    }

    pub async fn downloads_entries(&self) -> Vec<CleanupItem> {
        let scanner = Arc::clone(&self.scanner);
        tokio::task::spawn_blocking(move || scanner.downloads_entries())
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "downloads listing task failed");
                Vec::new()
            })
    }

    /// Runs the large-file walk unless one is already in flight on this
    /// instance, in which case it returns `None` straight away.
    pub async fn scan_large_files(&self, min_size_mb: u64) -> Option<Vec<CleanupItem>> {
        if self.large_scan_running.swap(true, Ordering::AcqRel) {
            tracing::debug!("large-file scan already running, ignoring request");
            return None;
        }
        let _guard = ScanFlagGuard(&self.large_scan_running);
        Some(self.scanner.scan_large_files(min_size_mb).await)
    }

    pub fn is_scanning_large_files(&self) -> bool {
        self.large_scan_running.load(Ordering::Acquire)
    }

    pub fn move_to_trash(&self, items: &[CleanupItem]) -> CleanupOutcome {
        self.executor.move_to_trash(items)
    }

    pub fn cleanup(&self, items: &[CleanupItem], dry_run: bool) -> CleanupOutcome {
        self.executor.cleanup(items, dry_run)
    }
}
