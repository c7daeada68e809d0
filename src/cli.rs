//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// macbundle - relocatable macOS application bundles
///
/// Vendors framework dependencies into an application bundle and rewrites
/// the bundle's binaries to resolve them relative to their own location.
#[derive(Parser, Debug)]
#[command(
    name = "macbundle",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Make macOS application bundles relocatable",
    long_about = "macbundle copies external frameworks into an application bundle's Frameworks \
                  directory and rewrites the embedded load paths of the bundle's executables \
                  from absolute install paths to relocation-token paths, so the bundle runs \
                  wherever it is moved.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  macbundle vendor\n    \
                  macbundle vendor SDL SDL_mixer\n    \
                  macbundle relocate\n    \
                  macbundle pack\n    \
                  macbundle verify\n    \
                  macbundle inspect Thonny.app/Contents/MacOS/thonny"
)]
pub struct Cli {
    /// Manifest file (defaults to ./macbundle.yaml)
    #[arg(long, short = 'm', global = true)]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy frameworks into the bundle's Frameworks directory
    Vendor(VendorArgs),

    /// Rewrite load paths in the bundle's executables
    Relocate(RelocateArgs),

    /// Vendor all frameworks, then relocate all executables
    Pack(PackArgs),

    /// Verify vendored frameworks against their sources
    Verify(VerifyArgs),

    /// Print a binary's dylib load paths and runtime search paths
    Inspect(InspectArgs),

    /// List configured frameworks and their vendored status
    List(ListArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the vendor command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Vendor every framework in the manifest:\n    macbundle vendor\n\n\
                  Vendor selected frameworks:\n    macbundle vendor SDL SDL_mixer\n\n\
                  Override the destination:\n    macbundle vendor --frameworks-dir App.app/Contents/Frameworks")]
pub struct VendorArgs {
    /// Framework names to vendor (defaults to all in the manifest)
    pub names: Vec<String>,

    /// Destination Frameworks directory inside the bundle
    #[arg(long, env = "MACBUNDLE_FRAMEWORKS_DIR", value_name = "DIR")]
    pub frameworks_dir: Option<PathBuf>,
}

/// Arguments for the relocate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Relocate everything in the manifest:\n    macbundle relocate\n\n\
                  Tolerate rules that no longer match (e.g. on a re-run):\n    macbundle relocate --allow-missing")]
pub struct RelocateArgs {
    /// Frameworks directory holding the vendored copies
    #[arg(long, env = "MACBUNDLE_FRAMEWORKS_DIR", value_name = "DIR")]
    pub frameworks_dir: Option<PathBuf>,

    /// Treat rewrite rules that match no load command as warnings
    #[arg(long)]
    pub allow_missing: bool,
}

/// Arguments for the pack command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Full run (vendor, then relocate):\n    macbundle pack\n\n\
                  With the destination from the environment:\n    MACBUNDLE_FRAMEWORKS_DIR=App.app/Contents/Frameworks macbundle pack")]
pub struct PackArgs {
    /// Frameworks directory inside the bundle
    #[arg(long, env = "MACBUNDLE_FRAMEWORKS_DIR", value_name = "DIR")]
    pub frameworks_dir: Option<PathBuf>,

    /// Treat rewrite rules that match no load command as warnings
    #[arg(long)]
    pub allow_missing: bool,
}

/// Arguments for the verify command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Verify every vendored framework:\n    macbundle verify\n\n\
                  Verify one framework, machine-readable:\n    macbundle verify SDL --json")]
pub struct VerifyArgs {
    /// Framework names to verify (defaults to all in the manifest)
    pub names: Vec<String>,

    /// Frameworks directory holding the vendored copies
    #[arg(long, env = "MACBUNDLE_FRAMEWORKS_DIR", value_name = "DIR")]
    pub frameworks_dir: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show a binary's load commands:\n    macbundle inspect Thonny.app/Contents/MacOS/thonny\n\n\
                  Machine-readable:\n    macbundle inspect --json Frameworks/SDL.framework/Versions/A/SDL")]
pub struct InspectArgs {
    /// Path to the binary
    pub binary: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List configured frameworks:\n    macbundle list\n\n\
                  Machine-readable:\n    macbundle list --json")]
pub struct ListArgs {
    /// Frameworks directory, for vendored-status reporting
    #[arg(long, env = "MACBUNDLE_FRAMEWORKS_DIR", value_name = "DIR")]
    pub frameworks_dir: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    macbundle completions --shell bash > ~/.bash_completion.d/macbundle\n\n\
                  Generate zsh completions:\n    macbundle completions --shell zsh > ~/.zfunc/_macbundle")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
