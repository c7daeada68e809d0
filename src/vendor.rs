//! Framework vendoring: copying installed frameworks into the bundle
//!
//! A vendor run copies the source framework tree into a staging directory
//! next to the destination, then swaps it into place. A failed copy never
//! leaves a half-written `<name>.framework` behind; re-running (which starts
//! by replacing any prior copy) is the recovery mechanism and is idempotent.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{MacbundleError, Result};
use crate::hash;
use crate::manifest::FrameworkSpec;
use crate::progress::CopyProgress;

/// Result of vendoring one framework
#[derive(Debug)]
pub struct VendorOutcome {
    pub name: String,
    pub destination: PathBuf,
    pub files_copied: u64,
    /// Whether a prior vendored copy was replaced
    pub replaced: bool,
}

/// Result of verifying one vendored framework against its source
#[derive(Debug, serde::Serialize)]
pub struct VerifyOutcome {
    pub name: String,
    pub hash: String,
}

fn copy_error(path: &Path, e: impl std::fmt::Display) -> MacbundleError {
    MacbundleError::CopyFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Compile a framework's exclude patterns
fn compile_excludes(spec: &FrameworkSpec) -> Result<Vec<Glob<'static>>> {
    spec.exclude
        .iter()
        .map(|pattern| {
            Glob::new(pattern)
                .map(Glob::into_owned)
                .map_err(|e| {
                    crate::error::manifest_invalid(format!(
                        "framework '{}' has an invalid exclude pattern '{}': {}",
                        spec.name, pattern, e
                    ))
                })
        })
        .collect()
}

/// A path is excluded when it, or any directory above it, matches a pattern.
/// Matching a directory prunes the whole subtree.
fn is_excluded(excludes: &[Glob<'_>], relative: &Path) -> bool {
    relative
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .any(|p| {
            excludes
                .iter()
                .any(|glob| glob.is_match(CandidatePath::from(p)))
        })
}

/// Number of files and links a vendor run will copy, for progress sizing.
///
/// Applies the framework's exclude patterns so the bar's total matches what
/// the copy actually transfers. Unreadable entries and invalid patterns are
/// ignored here; [`vendor_framework`] re-checks both and fails properly.
pub fn count_copy_entries(spec: &FrameworkSpec) -> u64 {
    let excludes = compile_excludes(spec).unwrap_or_default();
    WalkDir::new(&spec.source)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() || e.file_type().is_symlink())
        .filter(|e| {
            let relative = e.path().strip_prefix(&spec.source).unwrap_or(e.path());
            !is_excluded(&excludes, relative)
        })
        .count() as u64
}

/// Vendor one framework into the bundle's Frameworks directory.
///
/// The source must exist before anything is touched at the destination.
pub fn vendor_framework(
    spec: &FrameworkSpec,
    frameworks_dir: &Path,
    progress: &CopyProgress,
) -> Result<VendorOutcome> {
    if !spec.source.exists() {
        return Err(crate::error::source_not_found(
            spec.source.display().to_string(),
        ));
    }
    if !spec.source.is_dir() {
        return Err(crate::error::manifest_invalid(format!(
            "framework '{}' source {} is not a directory",
            spec.name,
            spec.source.display()
        )));
    }

    let excludes = compile_excludes(spec)?;
    let destination = spec.destination(frameworks_dir);

    fs::create_dir_all(frameworks_dir).map_err(|e| copy_error(frameworks_dir, e))?;

    // Stage next to the destination so the final swap is a rename
    let staging = tempfile::Builder::new()
        .prefix(".macbundle-stage-")
        .tempdir_in(frameworks_dir)
        .map_err(|e| copy_error(frameworks_dir, e))?;
    let staged = staging.path().join(spec.dir_name());

    let files_copied =
        copy_tree(&spec.source, &staged, &spec.source, &excludes, progress)?;

    let replaced = destination.exists();
    if replaced {
        fs::remove_dir_all(&destination).map_err(|e| copy_error(&destination, e))?;
    }
    fs::rename(&staged, &destination).map_err(|e| copy_error(&destination, e))?;

    Ok(VendorOutcome {
        name: spec.name.clone(),
        destination,
        files_copied,
        replaced,
    })
}

/// Recursively copy a framework tree, preserving symlinks and skipping
/// excluded paths. Returns the number of files and links copied.
fn copy_tree(
    src: &Path,
    dst: &Path,
    root: &Path,
    excludes: &[Glob<'_>],
    progress: &CopyProgress,
) -> Result<u64> {
    fs::create_dir_all(dst).map_err(|e| copy_error(dst, e))?;

    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(|e| copy_error(src, e))? {
        let entry = entry.map_err(|e| copy_error(src, e))?;
        let entry_path = entry.path();
        let relative = entry_path.strip_prefix(root).unwrap_or(&entry_path);

        if is_excluded(excludes, relative) {
            continue;
        }

        let dst_path = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| copy_error(&entry_path, e))?;

        if file_type.is_symlink() {
            copy_symlink(&entry_path, &dst_path)?;
            progress.tick(&relative.display().to_string());
            copied += 1;
        } else if file_type.is_dir() {
            copied += copy_tree(&entry_path, &dst_path, root, excludes, progress)?;
        } else {
            fs::copy(&entry_path, &dst_path).map_err(|e| copy_error(&dst_path, e))?;
            progress.tick(&relative.display().to_string());
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src).map_err(|e| copy_error(src, e))?;
    std::os::unix::fs::symlink(&target, dst).map_err(|e| copy_error(dst, e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, _dst: &Path) -> Result<()> {
    Err(crate::error::io_error(format!(
        "cannot reproduce symlink {} on this platform",
        src.display()
    )))
}

/// Check whether a framework's vendored copy is present
pub fn is_vendored(spec: &FrameworkSpec, frameworks_dir: &Path) -> bool {
    spec.destination(frameworks_dir).is_dir()
}

/// Verify a vendored framework is content-identical to its source.
///
/// The source is hashed with the framework's exclude patterns applied, so a
/// copy made with excludes still verifies clean.
pub fn verify_framework(spec: &FrameworkSpec, frameworks_dir: &Path) -> Result<VerifyOutcome> {
    let destination = spec.destination(frameworks_dir);
    if !destination.is_dir() {
        return Err(MacbundleError::NotVendored {
            name: spec.name.clone(),
        });
    }

    let excludes = compile_excludes(spec)?;
    let source_hash =
        hash::hash_directory_where(&spec.source, |rel| !is_excluded(&excludes, rel))?;
    let vendored_hash = hash::hash_directory(&destination)?;

    if source_hash != vendored_hash {
        return Err(MacbundleError::HashMismatch {
            name: spec.name.clone(),
        });
    }

    Ok(VerifyOutcome {
        name: spec.name.clone(),
        hash: vendored_hash,
    })
}
