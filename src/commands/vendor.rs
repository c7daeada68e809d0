//! Vendor command implementation
//!
//! Copies each selected framework from its system install location into the
//! bundle's Frameworks directory, replacing any prior copy.

use std::path::Path;

use console::Style;

use crate::cli::VendorArgs;
use crate::commands::helpers;
use crate::error::Result;
use crate::manifest::FrameworkSpec;
use crate::progress::CopyProgress;
use crate::vendor;

/// Run vendor command
pub fn run(manifest: Option<std::path::PathBuf>, args: VendorArgs) -> Result<()> {
    let manifest = helpers::load_manifest(manifest)?;
    let frameworks_dir = manifest.resolve_frameworks_dir(args.frameworks_dir.as_deref())?;
    let selected = helpers::select_frameworks(&manifest, &args.names)?;
    vendor_all(&selected, &frameworks_dir)
}

/// Vendor each framework in turn; the first failure aborts the sequence
pub(crate) fn vendor_all(specs: &[&FrameworkSpec], frameworks_dir: &Path) -> Result<()> {
    for spec in specs {
        let progress = CopyProgress::new(vendor::count_copy_entries(spec));
        let outcome = match vendor::vendor_framework(spec, frameworks_dir, &progress) {
            Ok(outcome) => {
                progress.finish();
                outcome
            }
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };

        let verb = if outcome.replaced { "Replaced" } else { "Vendored" };
        println!(
            "{} {} ({} files) -> {}",
            Style::new().bold().green().apply_to(verb),
            spec.dir_name(),
            outcome.files_copied,
            outcome.destination.display()
        );
    }
    Ok(())
}
