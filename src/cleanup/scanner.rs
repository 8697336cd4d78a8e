use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::catalog::CleanupCatalog;
use super::item::{CleanupCategory, CleanupItem, total_bytes};
use super::walk::{self, LargeFileWalk, Step};

/// Entries a cooperative large-file walk may examine before yielding.
pub const YIELD_EVERY: u64 = 100;

pub const DEFAULT_LARGE_FILE_MIN_MB: u64 = 100;

/// One row of the large-file root table. `path` may start with `~/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanRoot {
    pub path: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl ScanRoot {
    pub fn new(path: impl Into<String>) -> Self {
        ScanRoot {
            path: path.into(),
            enabled: true,
        }
    }

    /// Expands a leading `~` against `home`; `None` if it needs a home we don't have.
    pub fn resolve(&self, home: Option<&Path>) -> Option<PathBuf> {
        if self.path == "~" {
            return home.map(Path::to_path_buf);
        }
        match self.path.strip_prefix("~/") {
            Some(rest) => home.map(|h| h.join(rest)),
            None => Some(PathBuf::from(&self.path)),
        }
    }
}

pub fn default_large_scan_roots() -> Vec<ScanRoot> {
    [
        "~/Downloads",
        "~/Documents",
        "~/Movies",
        "~/Desktop",
        "~/Library/Caches",
        "~/Library/Developer/Xcode/DerivedData",
        "/Library/Caches",
    ]
    .into_iter()
    .map(ScanRoot::new)
    .collect()
}

/// Result of the overview scan: what can be emptied in place, and what sits
/// in Downloads.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    pub standard: Vec<CleanupItem>,
    pub downloads: Vec<CleanupItem>,
}

impl ScanSummary {
    pub fn standard_bytes(&self) -> u64 {
        total_bytes(&self.standard)
    }

    pub fn downloads_bytes(&self) -> u64 {
        total_bytes(&self.downloads)
    }
}

#[derive(Debug, Clone)]
pub struct CleanupScanner {
    catalog: CleanupCatalog,
    large_roots: Vec<ScanRoot>,
}

impl Default for CleanupScanner {
    fn default() -> Self {
        Self::new(CleanupCatalog::new(), default_large_scan_roots())
    }
}

impl CleanupScanner {
    pub fn new(catalog: CleanupCatalog, large_roots: Vec<ScanRoot>) -> Self {
        CleanupScanner {
            catalog,
            large_roots,
        }
    }

    pub fn catalog(&self) -> &CleanupCatalog {
        &self.catalog
    }

    /// One item per existing category root with visible content, in
    /// category then root order.
    pub fn scan(&self, categories: &[CleanupCategory]) -> Vec<CleanupItem> {
        let _span = tracing::debug_span!("scanner.scan").entered();

        let mut items = Vec::new();
        for &category in categories {
            for root in self.catalog.roots_for(category) {
                let size = walk::visible_size(&root);
                tracing::debug!(?category, root = %root.display(), size, "scanned root");
                if size > 0 {
                    items.push(CleanupItem::new(category, root, size));
                }
            }
        }
        items
    }

    /// One item per immediate child of each Downloads root.
    pub fn downloads_entries(&self) -> Vec<CleanupItem> {
        let mut items = Vec::new();
        for root in self.catalog.roots_for(CleanupCategory::Downloads) {
            let Ok(entries) = fs::read_dir(&root) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if walk::is_hidden(&path) {
                    continue;
                }
                let size = match entry.file_type() {
                    Ok(ft) if ft.is_dir() => walk::total_size(&path),
                    Ok(_) => entry.metadata().map(|m| m.len()).unwrap_or(0),
                    Err(_) => continue,
                };
                items.push(CleanupItem::new(CleanupCategory::Downloads, path, size));
            }
        }
        items
    }

    pub fn large_file_walk(&self, min_size_mb: u64) -> LargeFileWalk {
        let home = self.catalog.home();
        let roots = self
            .large_roots
            .iter()
            .filter(|root| root.enabled)
            .filter_map(|root| root.resolve(home.as_deref()))
            .collect();
        LargeFileWalk::new(roots, min_size_bytes(min_size_mb))
    }

    /// Large-file scan for cooperative hosts: yields to the runtime every
    /// [`YIELD_EVERY`] examined entries.
    pub async fn scan_large_files(&self, min_size_mb: u64) -> Vec<CleanupItem> {
        let mut walk = self.large_file_walk(min_size_mb);
        let mut found = Vec::new();
        loop {
            match walk.step() {
                Step::Found(item) => found.push(item),
                Step::Visited => {}
                Step::Done => break,
            }
            if walk.visited() % YIELD_EVERY == 0 {
                tokio::task::yield_now().await;
            }
        }
        tracing::debug!(visited = walk.visited(), found = found.len(), "large-file scan done");
        sort_largest_first(&mut found);
        found
    }

    /// Same walk for thread-based hosts; runs to completion without yielding.
    pub fn scan_large_files_blocking(&self, min_size_mb: u64) -> Vec<CleanupItem> {
        let mut found: Vec<CleanupItem> = self.large_file_walk(min_size_mb).collect();
        sort_largest_first(&mut found);
        found
    }
}

fn min_size_bytes(min_size_mb: u64) -> u64 {
    min_size_mb.saturating_mul(1024 * 1024)
}

// Stable, so equal sizes keep traversal order.
fn sort_largest_first(items: &mut [CleanupItem]) {
    items.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
}
