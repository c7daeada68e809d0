//! Relocate command implementation
//!
//! Rewrites load paths in two passes: first the shared-library binaries
//! inside each vendored framework (their install names must point at the
//! vendored copy), then the bundle's own executables. Both passes require
//! the vendor step to have completed; relocating a framework binary that
//! was never vendored is an error, not a silent skip.

use std::path::Path;

use console::Style;

use crate::cli::RelocateArgs;
use crate::commands::helpers;
use crate::error::{MacbundleError, Result};
use crate::manifest::{Manifest, RewriteRule};
use crate::relocate::{self, RelocateOutcome};
use crate::vendor;

/// Run relocate command
pub fn run(manifest: Option<std::path::PathBuf>, args: RelocateArgs) -> Result<()> {
    let manifest = helpers::load_manifest(manifest)?;
    relocate_all(&manifest, args.frameworks_dir.as_deref(), args.allow_missing)
}

/// Relocate framework-internal binaries, then the bundle's executables
pub(crate) fn relocate_all(
    manifest: &Manifest,
    frameworks_dir_override: Option<&Path>,
    allow_missing: bool,
) -> Result<()> {
    let needs_frameworks_dir = manifest.frameworks.iter().any(|f| !f.binaries.is_empty());
    if needs_frameworks_dir {
        let frameworks_dir = manifest.resolve_frameworks_dir(frameworks_dir_override)?;
        relocate_framework_binaries(manifest, &frameworks_dir, allow_missing)?;
    }

    for executable in &manifest.executables {
        let outcome = relocate::relocate_executable(
            &executable.path,
            &executable.rewrites,
            executable.rpath.as_deref(),
            allow_missing,
        )?;
        report(&outcome);
    }

    Ok(())
}

fn relocate_framework_binaries(
    manifest: &Manifest,
    frameworks_dir: &Path,
    allow_missing: bool,
) -> Result<()> {
    for spec in &manifest.frameworks {
        if spec.binaries.is_empty() {
            continue;
        }
        if !vendor::is_vendored(spec, frameworks_dir) {
            return Err(MacbundleError::NotVendored {
                name: spec.name.clone(),
            });
        }

        let destination = spec.destination(frameworks_dir);
        for binary in &spec.binaries {
            // The binary's old install name is its absolute source location;
            // the new one resolves through the executable's rpath.
            let rule = RewriteRule {
                from: spec.source.join(binary).display().to_string(),
                to: format!("@rpath/{}/{}", spec.dir_name(), binary),
            };
            let outcome = relocate::relocate_executable(
                &destination.join(binary),
                &[rule],
                None,
                allow_missing,
            )?;
            report(&outcome);
        }
    }
    Ok(())
}

fn report(outcome: &RelocateOutcome) {
    println!(
        "{} {}",
        Style::new().bold().green().apply_to("Relocated"),
        outcome.path.display()
    );
    for rewrite in &outcome.rewrites {
        if rewrite.applied == 0 {
            println!(
                "  {} no load command matches {}",
                Style::new().bold().yellow().apply_to("warning:"),
                rewrite.from
            );
        } else {
            println!(
                "  {} -> {} ({} rewritten)",
                rewrite.from, rewrite.to, rewrite.applied
            );
        }
    }
    match outcome.rpath_added {
        Some(true) => println!("  added search path"),
        Some(false) => println!("  search path already present"),
        None => {}
    }
}
