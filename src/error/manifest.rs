//! Manifest loading and validation errors

use super::MacbundleError;

/// Creates a manifest-not-found error
pub fn not_found(path: impl Into<String>) -> MacbundleError {
    MacbundleError::ManifestNotFound { path: path.into() }
}

/// Creates a manifest-parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> MacbundleError {
    MacbundleError::ManifestParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid-manifest error
pub fn invalid(message: impl Into<String>) -> MacbundleError {
    MacbundleError::ManifestInvalid {
        message: message.into(),
    }
}
