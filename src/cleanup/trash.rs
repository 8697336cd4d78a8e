use std::borrow::Cow;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::system::platform;

#[derive(Debug, Error)]
pub enum TrashError {
    #[error("no home directory for the current user")]
    NoHome,
    #[error("moving to the trash is not supported on this platform")]
    Unsupported,
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TrashError {
    fn io(path: &Path, source: io::Error) -> Self {
        TrashError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Recoverable deletion: relocates a path somewhere it can be restored from.
pub trait TrashBin: Send + Sync {
    /// Moves `path` into the trash and returns where it ended up.
    fn trash(&self, path: &Path) -> Result<PathBuf, TrashError>;
}

/// The current user's trash, resolved on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeTrash;

impl TrashBin for HomeTrash {
    fn trash(&self, path: &Path) -> Result<PathBuf, TrashError> {
        let layout = platform::trash_layout().ok_or(TrashError::Unsupported)?;
        let home = dirs::home_dir().ok_or(TrashError::NoHome)?;
        let info_dir = layout.info.map(|info| home.join(info));
        move_into(path, &home.join(layout.files), info_dir.as_deref())
    }
}

/// A trash rooted at an arbitrary directory, optionally writing freedesktop
/// `.trashinfo` records into `info_dir`.
#[derive(Debug, Clone)]
pub struct DirectoryTrash {
    files_dir: PathBuf,
    info_dir: Option<PathBuf>,
}

impl DirectoryTrash {
    pub fn new(files_dir: impl Into<PathBuf>) -> Self {
        DirectoryTrash {
            files_dir: files_dir.into(),
            info_dir: None,
        }
    }

    pub fn with_info_dir(mut self, info_dir: impl Into<PathBuf>) -> Self {
        self.info_dir = Some(info_dir.into());
        self
    }
}

impl TrashBin for DirectoryTrash {
    fn trash(&self, path: &Path) -> Result<PathBuf, TrashError> {
        move_into(path, &self.files_dir, self.info_dir.as_deref())
    }
}

fn move_into(
    path: &Path,
    files_dir: &Path,
    info_dir: Option<&Path>,
) -> Result<PathBuf, TrashError> {
    if fs::symlink_metadata(path).is_err() {
        return Err(TrashError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let name = path.file_name().ok_or_else(|| TrashError::NotFound {
        path: path.to_path_buf(),
    })?;
    fs::create_dir_all(files_dir).map_err(|e| TrashError::io(files_dir, e))?;

    let destination = unique_destination(files_dir, name, info_dir);

    let info_file = match info_dir {
        Some(info_dir) => Some(write_trash_info(path, &destination, info_dir)?),
        None => None,
    };

    // Rename fails across volumes; that item stays where it is.
    if let Err(err) = fs::rename(path, &destination) {
        if let Some(info_file) = info_file {
            let _ = fs::remove_file(info_file);
        }
        return Err(TrashError::io(path, err));
    }
    Ok(destination)
}

/// `name`, then `stem 2.ext`, `stem 3.ext`, ... until nothing is in the way.
fn unique_destination(dir: &Path, name: &std::ffi::OsStr, info_dir: Option<&Path>) -> PathBuf {
    let taken = |candidate: &PathBuf| {
        fs::symlink_metadata(candidate).is_ok()
            || info_dir.is_some_and(|info| info.join(info_file_name(candidate)).exists())
    };

    let first = dir.join(name);
    if !taken(&first) {
        return first;
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    let extension = as_path.extension();

    (2u32..)
        .map(|n| {
            let mut candidate = OsString::from(&stem);
            candidate.push(format!(" {n}"));
            if let Some(ext) = extension {
                candidate.push(".");
                candidate.push(ext);
            }
            dir.join(candidate)
        })
        .find(|candidate| !taken(candidate))
        .unwrap_or(first)
}

fn info_file_name(destination: &Path) -> OsString {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".trashinfo");
    name
}

fn write_trash_info(
    original: &Path,
    destination: &Path,
    info_dir: &Path,
) -> Result<PathBuf, TrashError> {
    fs::create_dir_all(info_dir).map_err(|e| TrashError::io(info_dir, e))?;
    let original = std::path::absolute(original).map_err(|e| TrashError::io(original, e))?;
    let info_path = info_dir.join(info_file_name(destination));
    let contents = format!(
        "[Trash Info]\nPath={}\nDeletionDate={}\n",
        percent_encode_path(&original),
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
    );
    fs::write(&info_path, contents).map_err(|e| TrashError::io(&info_path, e))?;
    Ok(info_path)
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// Percent-encodes the raw path bytes, so names that are not valid UTF-8
/// restore to the same file.
fn percent_encode_path(path: &Path) -> String {
    let raw = path_bytes(path);
    let mut out = String::with_capacity(raw.len());
    for &byte in raw.iter() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
