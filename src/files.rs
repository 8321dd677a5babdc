//! File-system access: input directories, output paths and guarded writes.
//!
//! Writes never merge with existing content. A target that already exists is
//! only replaced when overwriting was requested.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::PolicyError;

pub const EXTENSION_JSON: &str = "json";
pub const EXTENSION_MARKDOWN: &str = "md";

/// Permissions for generated policy files.
pub const MODE_POLICY_FILE: u32 = 0o644;
/// Permissions for the generated documentation file.
pub const MODE_DOCUMENTATION_FILE: u32 = 0o600;

/// A directory given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    path: PathBuf,
}

impl Directory {
    /// Wrap `path`, failing when it is empty or not an existing directory.
    pub fn existing(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(PolicyError::MissingDirectory(String::new()));
        }
        if !path.is_dir() {
            return Err(PolicyError::MissingDirectory(path.display().to_string()));
        }

        Ok(Directory { path: clean(path) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List regular files below the directory, sorted by path. Symlinks are
    /// skipped; subdirectories are only entered when `recursive` is set.
    pub fn list_file_paths(&self, recursive: bool) -> Result<Vec<PathBuf>, PolicyError> {
        let mut walker = WalkDir::new(&self.path).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| PolicyError::Io {
                path: e.path().unwrap_or(self.path.as_path()).display().to_string(),
                message: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }

        Ok(paths)
    }
}

/// `<dir>/<name>.json`, the output path of a policy document.
pub fn policy_file_path(dir: &Directory, name: &str) -> PathBuf {
    dir.path().join(format!("{name}.{EXTENSION_JSON}"))
}

/// Validate a documentation file path. The parent directory must exist and
/// the path must not point at a directory. The `.md` extension is enforced.
pub fn documentation_file_path(path: impl AsRef<Path>) -> Result<PathBuf, PolicyError> {
    let path = path.as_ref();
    let invalid = || PolicyError::InvalidPath(path.display().to_string());

    if path.is_dir() {
        return Err(invalid());
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(invalid)?;
    let stem = match file_name.split('.').collect::<Vec<_>>().as_slice() {
        [stem] | [stem, _] if !stem.is_empty() => stem.to_string(),
        _ => return Err(invalid()),
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let directory = Directory::existing(parent)?;

    Ok(directory.path().join(format!("{stem}.{EXTENSION_MARKDOWN}")))
}

/// Read a file as text. Returns `None` for content that is not valid UTF-8.
pub fn read_text(path: &Path) -> Result<Option<String>, PolicyError> {
    let bytes = fs::read(path).map_err(|e| PolicyError::io(path, e))?;
    Ok(String::from_utf8(bytes).ok())
}

/// Fail with [`PolicyError::FileExists`] when `path` exists and overwriting
/// was not requested.
pub fn ensure_writable(path: &Path, overwrite: bool) -> Result<(), PolicyError> {
    if !overwrite && path.exists() {
        return Err(PolicyError::FileExists(path.display().to_string()));
    }
    Ok(())
}

/// Write `data` to `path`. A missing file is always created; an existing
/// file is fully replaced when `overwrite` is set and left untouched otherwise.
pub fn write_file(
    path: &Path,
    data: &[u8],
    mode: u32,
    overwrite: bool,
) -> Result<(), PolicyError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => PolicyError::FileExists(path.display().to_string()),
        _ => PolicyError::io(path, e),
    })?;
    file.write_all(data).map_err(|e| PolicyError::io(path, e))?;

    debug!(event = "Write", path = %path.display(), bytes = data.len());
    Ok(())
}

/// Serialize `value` as indented JSON with a trailing newline and write it.
pub fn write_json<T: serde::Serialize>(
    path: &Path,
    value: &T,
    mode: u32,
    overwrite: bool,
) -> Result<(), PolicyError> {
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');
    write_file(path, &data, mode, overwrite)
}

fn clean(path: &Path) -> PathBuf {
    path.components().collect()
}
