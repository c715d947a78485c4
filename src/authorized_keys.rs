//! Interact with the OpenSSH `authorized_keys` file.
//!
//! # File format
//! https://man.openbsd.org/sshd.8#AUTHORIZED_KEYS_FILE_FORMAT
use crate::key::AuthorizedKey;
use std::{
    fs,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, trace};

/// Permissions applied to the directory containing the keys file.
const DIR_MODE: u32 = 0o700;
/// Permissions applied to the keys file itself.
const FILE_MODE: u32 = 0o600;

/// The authorized keys file.
///
/// Opening the store creates the file and its parent directory when missing
/// and re-applies owner-only permissions on both, every invocation.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
}

/// An append failure partway through a merge.
///
/// The keys counted by `added` were written before the failure and remain in
/// the file.
#[derive(thiserror::Error, Debug)]
#[error("appended {added} key(s) before failing: {source}")]
pub struct MergeError {
    pub added: usize,
    #[source]
    pub source: io::Error,
}

impl Store {
    /// Open the store, creating the file and its parent directory with
    /// owner-only permissions as needed.
    #[tracing::instrument(level = "trace")]
    pub fn open(path: PathBuf) -> io::Result<Self> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !dir.exists() {
                trace!(dir = %dir.display(), "Creating SSH directory");
                fs::create_dir_all(dir)?;
            }
            set_mode(dir, DIR_MODE)?;
        }
        if !path.exists() {
            trace!(path = %path.display(), "Creating authorized keys file");
            fs::File::create(&path)?;
        }
        set_mode(&path, FILE_MODE)?;

        Ok(Store { path })
    }

    /// The path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries currently in the file, in order.
    ///
    /// Blank lines and comments are skipped.
    pub fn entries(&self) -> io::Result<Vec<String>> {
        let file = fs::File::open(&self.path)?;

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            entries.push(line.to_string());
        }
        Ok(entries)
    }

    /// Append the given keys to the file, skipping keys already present.
    ///
    /// Existing entries are never rewritten or reordered. Returns the number
    /// of keys appended; keys written before a failed write remain in the
    /// file and their count is carried by the error.
    pub fn merge(&self, keys: &[AuthorizedKey]) -> Result<usize, MergeError> {
        let existing = self
            .entries()
            .map_err(|source| MergeError { added: 0, source })?;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| MergeError { added: 0, source })?;

        let mut added = 0;
        for key in keys {
            if existing.iter().any(|entry| entry == key.as_str()) {
                debug!(key = %key.truncated(), "Skipping key already present");
                continue;
            }
            writeln!(file, "{key}").map_err(|source| MergeError { added, source })?;
            added += 1;
        }
        Ok(added)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

/// Permissions are only enforced on Unix-like systems.
#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
