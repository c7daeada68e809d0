//! Pack command implementation
//!
//! The full sequence: vendor every framework, then relocate everything.
//! Vendoring must complete before any binary is patched; the rewrite rules
//! for framework-internal binaries only resolve once the copy exists.

use crate::cli::PackArgs;
use crate::commands::{helpers, relocate, vendor};
use crate::error::Result;

/// Run pack command
pub fn run(manifest: Option<std::path::PathBuf>, args: PackArgs) -> Result<()> {
    let manifest = helpers::load_manifest(manifest)?;
    let frameworks_dir = manifest.resolve_frameworks_dir(args.frameworks_dir.as_deref())?;

    let all: Vec<_> = manifest.frameworks.iter().collect();
    vendor::vendor_all(&all, &frameworks_dir)?;

    relocate::relocate_all(&manifest, Some(&frameworks_dir), args.allow_missing)
}
