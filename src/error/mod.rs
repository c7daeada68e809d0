//! Error types and handling for macbundle
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`fs`]: File system errors (vendoring, copying)
//! - [`macho`]: Mach-O parsing and patching errors
//! - [`manifest`]: Manifest loading and validation errors

pub mod fs;
pub mod macho;
pub mod manifest;

// Re-export convenience constructors from submodules
#[allow(unused_imports)]
pub use fs::{
    copy_failed, io_error, not_writable, read_failed as file_read_failed,
    source_not_found, write_failed as file_write_failed,
};
#[allow(unused_imports)]
pub use macho::{
    no_matching_load_command, patch_failed, unrecognized_binary,
};
#[allow(unused_imports)]
pub use manifest::{
    invalid as manifest_invalid, not_found as manifest_not_found,
    parse_failed as manifest_parse_failed,
};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for macbundle operations
#[derive(Error, Diagnostic, Debug)]
pub enum MacbundleError {
    // File system errors
    #[error("Framework source not found: {path}")]
    #[diagnostic(
        code(macbundle::fs::source_not_found),
        help("Check that the framework is installed at the path given in the manifest")
    )]
    SourceNotFound { path: String },

    #[error("Failed to copy into {path}")]
    #[diagnostic(code(macbundle::fs::copy_failed))]
    CopyFailed { path: String, reason: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(macbundle::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(macbundle::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Not writable: {path}")]
    #[diagnostic(
        code(macbundle::fs::not_writable),
        help("The vendored copy may be read-only; macbundle grants write permission before patching, so this usually means the whole bundle directory is not owned by you")
    )]
    NotWritable { path: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(macbundle::fs::io_error))]
    IoError { message: String },

    // Mach-O errors
    #[error("Unrecognized binary format: {path}")]
    #[diagnostic(
        code(macbundle::macho::unrecognized_binary),
        help("macbundle patches thin 64-bit Mach-O files; universal (fat) and 32-bit binaries are not supported")
    )]
    UnrecognizedBinary { path: String, reason: String },

    #[error("Failed to patch binary: {path}")]
    #[diagnostic(code(macbundle::macho::patch_failed))]
    PatchFailed { path: String, reason: String },

    #[error("No load command in {path} references {reference}")]
    #[diagnostic(
        code(macbundle::macho::no_matching_load_command),
        help("The rewrite rule's 'from' path must exactly match the binary's load command; check with 'macbundle inspect'. Pass --allow-missing to continue anyway.")
    )]
    NoMatchingLoadCommand { path: String, reference: String },

    // Manifest errors
    #[error("Manifest not found: {path}")]
    #[diagnostic(
        code(macbundle::manifest::not_found),
        help("Create a macbundle.yaml or pass --manifest")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to parse manifest: {path}")]
    #[diagnostic(code(macbundle::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error("Invalid manifest: {message}")]
    #[diagnostic(code(macbundle::manifest::invalid))]
    ManifestInvalid { message: String },

    #[error("Framework '{name}' is not listed in the manifest")]
    #[diagnostic(code(macbundle::manifest::framework_not_found))]
    FrameworkNotFound { name: String },

    #[error("No frameworks directory configured")]
    #[diagnostic(
        code(macbundle::manifest::no_frameworks_dir),
        help("Pass --frameworks-dir, set MACBUNDLE_FRAMEWORKS_DIR, or add a 'frameworks_dir' key to the manifest")
    )]
    NoFrameworksDir,

    // Verification errors
    #[error("Vendored copy of '{name}' does not match its source")]
    #[diagnostic(
        code(macbundle::verify::hash_mismatch),
        help("Re-run 'macbundle vendor' to restore a pristine copy")
    )]
    HashMismatch { name: String },

    #[error("Framework '{name}' is not vendored")]
    #[diagnostic(
        code(macbundle::verify::not_vendored),
        help("Run 'macbundle vendor' first")
    )]
    NotVendored { name: String },
}

impl From<std::io::Error> for MacbundleError {
    fn from(err: std::io::Error) -> Self {
        MacbundleError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for MacbundleError {
    fn from(err: serde_yaml::Error) -> Self {
        MacbundleError::ManifestParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MacbundleError {
    fn from(err: serde_json::Error) -> Self {
        MacbundleError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, MacbundleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MacbundleError::SourceNotFound {
            path: "/Library/Frameworks/SDL.framework".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Framework source not found: /Library/Frameworks/SDL.framework"
        );
    }

    #[test]
    fn test_error_code() {
        let err = MacbundleError::NoFrameworksDir;
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("macbundle::manifest::no_frameworks_dir".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MacbundleError = io_err.into();
        assert!(matches!(err, MacbundleError::IoError { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "frameworks: [unclosed";
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str(yaml_str);
        let yaml_err = parse_result.unwrap_err();
        let err: MacbundleError = yaml_err.into();
        assert!(matches!(err, MacbundleError::ManifestParseFailed { .. }));
    }

    #[test]
    fn test_source_not_found_constructor() {
        let err = source_not_found("/missing/Python.framework");
        assert!(matches!(err, MacbundleError::SourceNotFound { .. }));
        assert!(err.to_string().contains("/missing/Python.framework"));
    }

    #[test]
    fn test_copy_failed_constructor() {
        let err = copy_failed("/dst/SDL.framework", "disk full");
        assert!(matches!(err, MacbundleError::CopyFailed { .. }));
        assert!(err.to_string().contains("Failed to copy"));
    }

    #[test]
    fn test_unrecognized_binary_constructor() {
        let err = unrecognized_binary("/bin/echo", "not a Mach-O magic");
        assert!(matches!(err, MacbundleError::UnrecognizedBinary { .. }));
        assert!(err.to_string().contains("Unrecognized binary format"));
    }

    #[test]
    fn test_patch_failed_constructor() {
        let err = patch_failed("/app/MacOS/app", "load commands exceed header padding");
        assert!(matches!(err, MacbundleError::PatchFailed { .. }));
        assert!(err.to_string().contains("Failed to patch binary"));
    }

    #[test]
    fn test_no_matching_load_command_constructor() {
        let err = no_matching_load_command("/app/MacOS/app", "/Library/Frameworks/Python");
        assert!(matches!(err, MacbundleError::NoMatchingLoadCommand { .. }));
        assert!(err.to_string().contains("No load command"));
    }

    #[test]
    fn test_manifest_constructors() {
        assert!(matches!(
            manifest_not_found("./macbundle.yaml"),
            MacbundleError::ManifestNotFound { .. }
        ));
        assert!(matches!(
            manifest_parse_failed("./macbundle.yaml", "bad yaml"),
            MacbundleError::ManifestParseFailed { .. }
        ));
        assert!(matches!(
            manifest_invalid("duplicate framework name"),
            MacbundleError::ManifestInvalid { .. }
        ));
    }
}
