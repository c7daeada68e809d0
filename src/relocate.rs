//! Executable relocation: rewriting embedded load paths in place
//!
//! Runs after vendoring, never before: rewrite rules typically target the
//! binaries inside the freshly vendored tree, and the write-permission grant
//! only makes sense once the copy exists.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{MacbundleError, Result};
use crate::macho::{MachFile, MachoError};
use crate::manifest::RewriteRule;

/// Result of applying one rewrite rule
#[derive(Debug, Serialize)]
pub struct RewriteOutcome {
    pub from: String,
    pub to: String,
    /// Number of load commands changed; zero means the rule did not match
    pub applied: usize,
}

/// Result of relocating one executable
#[derive(Debug, Serialize)]
pub struct RelocateOutcome {
    pub path: PathBuf,
    pub rewrites: Vec<RewriteOutcome>,
    /// None if no rpath was requested, Some(false) if it was already present
    pub rpath_added: Option<bool>,
}

/// Load commands of a binary, as shown by `macbundle inspect`
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub path: PathBuf,
    /// The binary's own install name, when it is a dylib
    pub id: Option<String>,
    pub dylibs: Vec<String>,
    pub rpaths: Vec<String>,
}

fn map_macho_error(path: &Path, err: MachoError) -> MacbundleError {
    match err {
        MachoError::Unrecognized(reason) => {
            crate::error::unrecognized_binary(path.display().to_string(), reason)
        }
        MachoError::Patch(reason) => {
            crate::error::patch_failed(path.display().to_string(), reason)
        }
    }
}

/// Grant write permission on the binary before patching.
///
/// Framework binaries frequently arrive read-only from the system install;
/// this step is mandatory, not best-effort.
fn grant_write_permission(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| MacbundleError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut permissions = metadata.permissions();
    if !permissions.readonly() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    permissions.set_readonly(false);

    fs::set_permissions(path, permissions)
        .map_err(|_| crate::error::not_writable(path.display().to_string()))
}

/// Rewrite an executable's load paths and register a runtime search path.
///
/// Every rule is matched exactly against the binary's dylib load commands
/// (including its own install name, for vendored dylibs). A rule that
/// matches nothing fails unless `allow_missing` is set; either way the
/// zero count is reported, never conflated with success.
pub fn relocate_executable(
    path: &Path,
    rules: &[RewriteRule],
    rpath: Option<&str>,
    allow_missing: bool,
) -> Result<RelocateOutcome> {
    let original = fs::read(path).map_err(|e| MacbundleError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    grant_write_permission(path)?;

    let mut macho = MachFile::parse(&original).map_err(|e| map_macho_error(path, e))?;

    let mut rewrites = Vec::with_capacity(rules.len());
    for rule in rules {
        let applied = macho.rewrite_dylib(&rule.from, &rule.to);
        if applied == 0 && !allow_missing {
            return Err(crate::error::no_matching_load_command(
                path.display().to_string(),
                rule.from.clone(),
            ));
        }
        rewrites.push(RewriteOutcome {
            from: rule.from.clone(),
            to: rule.to.clone(),
            applied,
        });
    }

    let rpath_added = rpath.map(|p| macho.add_rpath(p));

    let changed =
        rewrites.iter().any(|r| r.applied > 0) || rpath_added == Some(true);
    if changed {
        let patched = macho.patch(&original).map_err(|e| map_macho_error(path, e))?;
        fs::write(path, patched).map_err(|e| MacbundleError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    Ok(RelocateOutcome {
        path: path.to_path_buf(),
        rewrites,
        rpath_added,
    })
}

/// Read a binary's dylib references and runtime search paths
pub fn inspect_binary(path: &Path) -> Result<Inspection> {
    let data = fs::read(path).map_err(|e| MacbundleError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let macho = MachFile::parse(&data).map_err(|e| map_macho_error(path, e))?;

    Ok(Inspection {
        path: path.to_path_buf(),
        id: macho.id().map(str::to_string),
        dylibs: macho.dylib_paths().iter().map(|s| s.to_string()).collect(),
        rpaths: macho.rpaths().iter().map(|s| s.to_string()).collect(),
    })
}
