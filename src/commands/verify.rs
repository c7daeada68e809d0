//! Verify command implementation
//!
//! Confirms each vendored framework is content-identical to its source
//! (excluded paths aside). A failed copy or later tampering shows up as a
//! hash mismatch.

use console::Style;

use crate::cli::VerifyArgs;
use crate::commands::helpers;
use crate::error::Result;
use crate::vendor;

/// Run verify command
pub fn run(manifest: Option<std::path::PathBuf>, args: VerifyArgs) -> Result<()> {
    let manifest = helpers::load_manifest(manifest)?;
    let frameworks_dir = manifest.resolve_frameworks_dir(args.frameworks_dir.as_deref())?;
    let selected = helpers::select_frameworks(&manifest, &args.names)?;

    let mut outcomes = Vec::with_capacity(selected.len());
    for spec in &selected {
        outcomes.push(vendor::verify_framework(spec, &frameworks_dir)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    for outcome in &outcomes {
        println!(
            "{} {} matches source ({})",
            Style::new().bold().green().apply_to("ok"),
            outcome.name,
            outcome.hash
        );
    }
    Ok(())
}
