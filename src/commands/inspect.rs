//! Inspect command implementation
//!
//! Prints the dylib references and runtime search paths embedded in a
//! binary, for checking relocation results without reaching for otool.

use console::Style;

use crate::cli::InspectArgs;
use crate::error::Result;
use crate::relocate;

/// Run inspect command
pub fn run(args: InspectArgs) -> Result<()> {
    let inspection = relocate::inspect_binary(&args.binary)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    println!("{}:", Style::new().bold().apply_to(inspection.path.display()));
    if let Some(ref id) = inspection.id {
        println!("  {} {}", Style::new().bold().apply_to("id:"), id);
    }
    println!("  {}", Style::new().bold().apply_to("dylibs:"));
    for dylib in &inspection.dylibs {
        println!("    {dylib}");
    }
    println!("  {}", Style::new().bold().apply_to("rpaths:"));
    for rpath in &inspection.rpaths {
        println!("    {rpath}");
    }
    Ok(())
}
