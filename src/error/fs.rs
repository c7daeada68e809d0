//! File system errors

use super::MacbundleError;

/// Creates a source-not-found error
pub fn source_not_found(path: impl Into<String>) -> MacbundleError {
    MacbundleError::SourceNotFound { path: path.into() }
}

/// Creates a copy-failed error
pub fn copy_failed(path: impl Into<String>, reason: impl Into<String>) -> MacbundleError {
    MacbundleError::CopyFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file-read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> MacbundleError {
    MacbundleError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file-write error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> MacbundleError {
    MacbundleError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a not-writable error
pub fn not_writable(path: impl Into<String>) -> MacbundleError {
    MacbundleError::NotWritable { path: path.into() }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> MacbundleError {
    MacbundleError::IoError {
        message: message.into(),
    }
}
