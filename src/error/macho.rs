//! Mach-O parsing and patching errors

use super::MacbundleError;

/// Creates an unrecognized-binary error
pub fn unrecognized_binary(path: impl Into<String>, reason: impl Into<String>) -> MacbundleError {
    MacbundleError::UnrecognizedBinary {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a patch-failed error
pub fn patch_failed(path: impl Into<String>, reason: impl Into<String>) -> MacbundleError {
    MacbundleError::PatchFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a no-matching-load-command error
pub fn no_matching_load_command(
    path: impl Into<String>,
    reference: impl Into<String>,
) -> MacbundleError {
    MacbundleError::NoMatchingLoadCommand {
        path: path.into(),
        reference: reference.into(),
    }
}
