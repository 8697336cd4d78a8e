use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use crate::format::format_bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupCategory {
    SystemCaches,
    UserCaches,
    Logs,
    Trash,
    Downloads,
}

impl CleanupCategory {
    pub const ALL: [CleanupCategory; 5] = [
        CleanupCategory::SystemCaches,
        CleanupCategory::UserCaches,
        CleanupCategory::Logs,
        CleanupCategory::Trash,
        CleanupCategory::Downloads,
    ];

    /// Categories that are safe to empty in place; Downloads is handled
    /// separately because it holds user documents.
    pub const STANDARD: [CleanupCategory; 4] = [
        CleanupCategory::SystemCaches,
        CleanupCategory::UserCaches,
        CleanupCategory::Logs,
        CleanupCategory::Trash,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CleanupCategory::SystemCaches => "System Caches",
            CleanupCategory::UserCaches => "User Caches",
            CleanupCategory::Logs => "Logs",
            CleanupCategory::Trash => "Trash",
            CleanupCategory::Downloads => "Downloads",
        }
    }

    pub fn risk_level(self) -> RiskLevel {
        match self {
            CleanupCategory::SystemCaches => RiskLevel::Medium,
            CleanupCategory::UserCaches => RiskLevel::Low,
            CleanupCategory::Logs => RiskLevel::Low,
            CleanupCategory::Trash => RiskLevel::Low,
            CleanupCategory::Downloads => RiskLevel::Medium,
        }
    }

    pub fn from_str_config(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "system_caches" | "system" => Some(CleanupCategory::SystemCaches),
            "user_caches" | "caches" => Some(CleanupCategory::UserCaches),
            "logs" => Some(CleanupCategory::Logs),
            "trash" => Some(CleanupCategory::Trash),
            "downloads" => Some(CleanupCategory::Downloads),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// A reclaimable path found by a scan.
///
/// `id` is fresh for every constructed item, so two scans of the same path
/// never share ids. Compare with [`CleanupItem::same_target`] across scans.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupItem {
    pub id: Uuid,
    pub category: CleanupCategory,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub is_essential: bool,
}

impl CleanupItem {
    pub fn new(category: CleanupCategory, path: PathBuf, size_bytes: u64) -> Self {
        CleanupItem {
            id: Uuid::new_v4(),
            category,
            path,
            size_bytes,
            is_essential: false,
        }
    }

    pub fn same_target(&self, other: &CleanupItem) -> bool {
        self.category == other.category && self.path == other.path
    }

    pub fn formatted_size(&self) -> String {
        format_bytes(self.size_bytes)
    }
}

pub fn total_bytes(items: &[CleanupItem]) -> u64 {
    items.iter().map(|item| item.size_bytes).sum()
}

/// Aggregate result of a trash or delete batch. Per-entry failures only
/// show up as `skipped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupOutcome {
    pub bytes_freed: u64,
    pub removed: usize,
    pub skipped: usize,
}

impl CleanupOutcome {
    pub(crate) fn record_removed(&mut self, bytes: u64) {
        self.bytes_freed += bytes;
        self.removed += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_per_item() {
        let a = CleanupItem::new(CleanupCategory::Logs, PathBuf::from("/tmp/x"), 1);
        let b = CleanupItem::new(CleanupCategory::Logs, PathBuf::from("/tmp/x"), 1);
        assert_ne!(a.id, b.id);
        assert!(a.same_target(&b));
    }

    #[test]
    fn same_path_different_category_is_different_target() {
        let a = CleanupItem::new(CleanupCategory::Logs, PathBuf::from("/tmp/x"), 1);
        let b = CleanupItem::new(CleanupCategory::Trash, PathBuf::from("/tmp/x"), 1);
        assert!(!a.same_target(&b));
    }

    #[test]
    fn category_names_parse() {
        assert_eq!(
            CleanupCategory::from_str_config("user-caches"),
            Some(CleanupCategory::UserCaches)
        );
        assert_eq!(
            CleanupCategory::from_str_config("System Caches"),
            Some(CleanupCategory::SystemCaches)
        );
        assert_eq!(CleanupCategory::from_str_config("music"), None);
    }

    #[test]
    fn total_bytes_sums_sizes() {
        let items = vec![
            CleanupItem::new(CleanupCategory::Logs, PathBuf::from("a"), 10),
            CleanupItem::new(CleanupCategory::Logs, PathBuf::from("b"), 32),
        ];
        assert_eq!(total_bytes(&items), 42);
    }
}
