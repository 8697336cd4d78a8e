pub mod catalog;
pub mod executor;
pub mod item;
pub mod scanner;
pub mod trash;
pub mod walk;

pub use catalog::CleanupCatalog;
pub use executor::CleanupExecutor;
pub use item::{CleanupCategory, CleanupItem, CleanupOutcome, RiskLevel};
pub use scanner::{CleanupScanner, ScanRoot, ScanSummary};
pub use trash::{DirectoryTrash, HomeTrash, TrashBin, TrashError};
