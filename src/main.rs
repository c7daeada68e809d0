//! macbundle - relocatable macOS application bundles
//!
//! Copies external framework dependencies into an application bundle's
//! Frameworks directory and rewrites the embedded load paths of the
//! bundle's binaries so everything resolves relative to the executable,
//! wherever the bundle is moved.

use clap::Parser;

mod cli;
mod commands;
mod error;
mod hash;
mod macho;
mod manifest;
mod progress;
mod relocate;
mod vendor;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Vendor(args) => commands::vendor::run(cli.manifest, args),
        Commands::Relocate(args) => commands::relocate::run(cli.manifest, args),
        Commands::Pack(args) => commands::pack::run(cli.manifest, args),
        Commands::Verify(args) => commands::verify::run(cli.manifest, args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::List(args) => commands::list::run(cli.manifest, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
