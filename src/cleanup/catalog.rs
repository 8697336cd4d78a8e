use std::path::PathBuf;

use super::item::{CleanupCategory, RiskLevel};
use crate::system::platform::{self, CleanupLayout};

#[derive(Debug, Clone)]
enum HomeDir {
    /// Looked up on every call so a changed account or `$HOME` is picked up.
    Current,
    Fixed(PathBuf),
}

/// Maps cleanup categories to filesystem roots.
#[derive(Debug, Clone)]
pub struct CleanupCatalog {
    home: HomeDir,
    system_caches: PathBuf,
    layout: CleanupLayout,
}

impl Default for CleanupCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanupCatalog {
    pub fn new() -> Self {
        let layout = platform::cleanup_layout();
        CleanupCatalog {
            home: HomeDir::Current,
            system_caches: PathBuf::from(layout.system_caches),
            layout,
        }
    }

    /// Catalog rooted at a fixed home and system cache directory.
    pub fn with_home(home: impl Into<PathBuf>, system_caches: impl Into<PathBuf>) -> Self {
        CleanupCatalog {
            home: HomeDir::Fixed(home.into()),
            system_caches: system_caches.into(),
            layout: platform::cleanup_layout(),
        }
    }

    pub fn home(&self) -> Option<PathBuf> {
        match &self.home {
            HomeDir::Current => dirs::home_dir(),
            HomeDir::Fixed(path) => Some(path.clone()),
        }
    }

    pub fn roots_for(&self, category: CleanupCategory) -> Vec<PathBuf> {
        let relative = match category {
            CleanupCategory::SystemCaches => return vec![self.system_caches.clone()],
            CleanupCategory::UserCaches => self.layout.user_caches,
            CleanupCategory::Logs => self.layout.logs,
            CleanupCategory::Trash => self.layout.trash,
            CleanupCategory::Downloads => self.layout.downloads,
        };
        let Some(home) = self.home() else {
            tracing::debug!(?category, "no home directory, category has no roots");
            return Vec::new();
        };
        relative.iter().map(|rel| home.join(rel)).collect()
    }

    pub fn risk_level(category: CleanupCategory) -> RiskLevel {
        category.risk_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_roots_resolve_under_home() {
        let catalog = CleanupCatalog::with_home("/home/tester", "/sys-caches");
        for category in [
            CleanupCategory::UserCaches,
            CleanupCategory::Logs,
            CleanupCategory::Downloads,
        ] {
            let roots = catalog.roots_for(category);
            assert!(!roots.is_empty(), "{category:?} has no roots");
            assert!(roots.iter().all(|r| r.starts_with("/home/tester")));
        }
    }

    #[test]
    fn system_caches_use_fixed_path() {
        let catalog = CleanupCatalog::with_home("/home/tester", "/sys-caches");
        assert_eq!(
            catalog.roots_for(CleanupCategory::SystemCaches),
            vec![PathBuf::from("/sys-caches")]
        );
    }

    #[test]
    fn risk_levels_are_static() {
        assert_eq!(
            CleanupCatalog::risk_level(CleanupCategory::SystemCaches),
            RiskLevel::Medium
        );
        assert_eq!(
            CleanupCatalog::risk_level(CleanupCategory::UserCaches),
            RiskLevel::Low
        );
        assert_eq!(
            CleanupCatalog::risk_level(CleanupCategory::Downloads),
            RiskLevel::Medium
        );
    }
}
