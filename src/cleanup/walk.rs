//! Filesystem traversal used by the scanner and the executor.
//!
//! Both walks are iterative, never follow symlinks, and skip hidden entries
//! (names starting with `.`) unless told otherwise.

use std::collections::VecDeque;
use std::fs::{self, DirEntry, ReadDir};
use std::path::{Path, PathBuf};

use super::item::{CleanupCategory, CleanupItem};

/// Directory extensions treated as opaque documents (macOS bundles and
/// libraries). The walk neither descends into them nor reports them.
pub const PACKAGE_EXTENSIONS: &[&str] = &[
    "app",
    "bundle",
    "framework",
    "plugin",
    "kext",
    "pkg",
    "mpkg",
    "rtfd",
    "photoslibrary",
    "musiclibrary",
    "imovielibrary",
    "fcpbundle",
    "xcarchive",
    "xcodeproj",
    "xcworkspace",
    "playground",
];

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

pub fn is_package(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            PACKAGE_EXTENSIONS
                .iter()
                .any(|p| p.eq_ignore_ascii_case(ext))
        })
}

/// Sum of regular file sizes under `root`, skipping hidden entries.
pub fn visible_size(root: &Path) -> u64 {
    sum_sizes(root, true)
}

/// Sum of every regular file under `root`, hidden ones included.
pub fn total_size(root: &Path) -> u64 {
    sum_sizes(root, false)
}

fn sum_sizes(root: &Path, skip_hidden: bool) -> u64 {
    let mut total = 0u64;
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if skip_hidden && is_hidden(&path) {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                stack.push(path);
            } else if file_type.is_file()
                && let Ok(meta) = entry.metadata()
            {
                total += meta.len();
            }
        }
    }
    total
}

/// Outcome of advancing a [`LargeFileWalk`] by one entry.
#[derive(Debug)]
pub enum Step {
    Found(CleanupItem),
    Visited,
    Done,
}

/// Lazy depth-first walk reporting regular files larger than a threshold.
///
/// Each [`LargeFileWalk::step`] touches at most one directory entry, so a
/// host can interleave the walk with its own scheduling: a worker thread can
/// drain it as an iterator, a cooperative task can yield between steps.
pub struct LargeFileWalk {
    roots: VecDeque<PathBuf>,
    stack: Vec<ReadDir>,
    min_size_bytes: u64,
    visited: u64,
}

impl LargeFileWalk {
    pub fn new(roots: Vec<PathBuf>, min_size_bytes: u64) -> Self {
        LargeFileWalk {
            roots: roots.into(),
            stack: Vec::new(),
            min_size_bytes,
            visited: 0,
        }
    }

    /// Number of directory entries examined so far.
    pub fn visited(&self) -> u64 {
        self.visited
    }

    pub fn step(&mut self) -> Step {
        loop {
            let Some(dir) = self.stack.last_mut() else {
                let Some(root) = self.roots.pop_front() else {
                    return Step::Done;
                };
                self.open_root(&root);
                continue;
            };

            match dir.next() {
                None => {
                    self.stack.pop();
                }
                Some(Err(_)) => {
                    self.visited += 1;
                    return Step::Visited;
                }
                Some(Ok(entry)) => {
                    self.visited += 1;
                    return self.visit(entry);
                }
            }
        }
    }

    fn open_root(&mut self, root: &Path) {
        let is_dir = fs::metadata(root).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            tracing::debug!(root = %root.display(), "large-file root missing, skipped");
            return;
        }
        match fs::read_dir(root) {
            Ok(entries) => self.stack.push(entries),
            Err(err) => {
                tracing::debug!(root = %root.display(), %err, "large-file root unreadable");
            }
        }
    }

    fn visit(&mut self, entry: DirEntry) -> Step {
        let path = entry.path();
        if is_hidden(&path) {
            return Step::Visited;
        }
        let Ok(file_type) = entry.file_type() else {
            return Step::Visited;
        };

        if file_type.is_dir() {
            if !is_package(&path)
                && let Ok(entries) = fs::read_dir(&path)
            {
                self.stack.push(entries);
            }
            return Step::Visited;
        }
        if !file_type.is_file() {
            return Step::Visited;
        }

        match entry.metadata() {
            Ok(meta) if meta.len() > self.min_size_bytes => Step::Found(CleanupItem::new(
                CleanupCategory::Trash,
                path,
                meta.len(),
            )),
            _ => Step::Visited,
        }
    }
}

impl Iterator for LargeFileWalk {
    type Item = CleanupItem;

    fn next(&mut self) -> Option<CleanupItem> {
        loop {
            match self.step() {
                Step::Found(item) => return Some(item),
                Step::Visited => continue,
                Step::Done => return None,
            }
        }
    }
}
