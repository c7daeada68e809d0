//! List command implementation
//!
//! Shows the manifest's frameworks with their sources and, when a
//! Frameworks directory is resolvable, whether each is currently vendored.

use console::Style;
use serde_json::json;

use crate::cli::ListArgs;
use crate::commands::helpers;
use crate::error::Result;
use crate::vendor;

/// Run list command
pub fn run(manifest: Option<std::path::PathBuf>, args: ListArgs) -> Result<()> {
    let manifest = helpers::load_manifest(manifest)?;
    // Without a frameworks dir the listing still works, minus status
    let frameworks_dir = manifest
        .resolve_frameworks_dir(args.frameworks_dir.as_deref())
        .ok();

    if args.json {
        let rows: Vec<_> = manifest
            .frameworks
            .iter()
            .map(|spec| {
                json!({
                    "name": spec.name,
                    "version": spec.version,
                    "source": spec.source,
                    "binaries": spec.binaries,
                    "vendored": frameworks_dir
                        .as_deref()
                        .map(|dir| vendor::is_vendored(spec, dir)),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if manifest.frameworks.is_empty() {
        println!("No frameworks configured.");
        return Ok(());
    }

    println!("Configured frameworks ({}):", manifest.frameworks.len());
    println!();
    for spec in &manifest.frameworks {
        println!("  {}", Style::new().bold().yellow().apply_to(&spec.name));
        if let Some(ref version) = spec.version {
            println!("    {} {}", Style::new().bold().apply_to("Version:"), version);
        }
        println!(
            "    {} {}",
            Style::new().bold().apply_to("Source:"),
            spec.source.display()
        );
        let status = match frameworks_dir.as_deref() {
            Some(dir) if vendor::is_vendored(spec, dir) => "vendored",
            Some(_) => "not vendored",
            None => "unknown (no frameworks directory configured)",
        };
        println!("    {} {}", Style::new().bold().apply_to("Status:"), status);
        println!();
    }
    Ok(())
}
