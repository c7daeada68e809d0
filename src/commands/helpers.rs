//! Shared helpers for command implementations

use std::path::PathBuf;

use normpath::PathExt;

use crate::error::Result;
use crate::manifest::{FrameworkSpec, MANIFEST_FILE, Manifest};

/// Load the manifest from the given path, or ./macbundle.yaml by default.
///
/// The path is normalized so diagnostics show a clean path even when the
/// tool is invoked with a relative `-m ../...` argument.
pub fn load_manifest(manifest: Option<PathBuf>) -> Result<Manifest> {
    let path = manifest.unwrap_or_else(|| PathBuf::from(MANIFEST_FILE));
    let path = path
        .normalize()
        .map(|normalized| normalized.into_path_buf())
        .unwrap_or(path);
    Manifest::load(&path)
}

/// Resolve the frameworks named on the command line, or all of them
pub fn select_frameworks<'a>(
    manifest: &'a Manifest,
    names: &[String],
) -> Result<Vec<&'a FrameworkSpec>> {
    if names.is_empty() {
        return Ok(manifest.frameworks.iter().collect());
    }
    names.iter().map(|name| manifest.framework(name)).collect()
}
