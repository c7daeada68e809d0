//! BLAKE3 hashing utilities for vendored-tree verification

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::{MacbundleError, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

fn read_error(path: &Path, e: impl std::fmt::Display) -> MacbundleError {
    MacbundleError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn hash_file_into(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| read_error(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| read_error(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(())
}

/// Calculate BLAKE3 hash of a directory's contents
///
/// Hashes all regular files and symlinks recursively, sorted by relative
/// path for deterministic results. A symlink contributes its target string
/// rather than the pointed-to contents, so framework version links
/// (`Versions/Current` etc.) compare structurally.
pub fn hash_directory(path: &Path) -> Result<String> {
    hash_directory_where(path, |_| true)
}

/// Like [`hash_directory`], but only hashes entries whose path relative to
/// the root passes `keep`. Used to compare a source tree against a vendored
/// copy that was made with exclude patterns.
pub fn hash_directory_where(path: &Path, keep: impl Fn(&Path) -> bool) -> Result<String> {
    if !path.is_dir() {
        return Err(MacbundleError::SourceNotFound {
            path: path.display().to_string(),
        });
    }

    let mut hasher = Hasher::new();
    let mut entries = Vec::new();
    for entry in WalkDir::new(path) {
        // An unreadable entry must fail the hash, not skew it
        let entry = entry.map_err(|e| {
            let entry_path = e.path().unwrap_or(path).display().to_string();
            MacbundleError::FileReadFailed {
                path: entry_path,
                reason: e.to_string(),
            }
        })?;
        if !entry.file_type().is_file() && !entry.file_type().is_symlink() {
            continue;
        }
        if !keep(entry.path().strip_prefix(path).unwrap_or(entry.path())) {
            continue;
        }
        entries.push(entry);
    }

    // Sort for deterministic hashing
    entries.sort_by_key(|e| e.path().to_path_buf());

    for entry in entries {
        let entry_path = entry.path();

        // Include relative path in hash for uniqueness
        let relative_path = entry_path
            .strip_prefix(path)
            .unwrap_or(entry_path)
            .to_string_lossy();
        hasher.update(relative_path.as_bytes());
        hasher.update(b"\0");

        if entry.file_type().is_symlink() {
            let target =
                std::fs::read_link(entry_path).map_err(|e| read_error(entry_path, e))?;
            hasher.update(b"link\0");
            hasher.update(target.to_string_lossy().as_bytes());
        } else {
            hash_file_into(&mut hasher, entry_path)?;
        }

        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}
