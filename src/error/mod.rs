//! # Error Module
//!
//! User-friendly error types for GearView.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Local failures stay local** - a bad file never aborts a batch

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum GearViewError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Relocation error: {0}")]
    Relocate(#[from] RelocateError),

    #[error("{0}")]
    Input(#[from] InputError),

    /// A background scan finished with an error outcome
    #[error("An error occurred during scanning: {0}")]
    ScanFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur during photo scanning
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A scan is already in progress")]
    AlreadyRunning,

    #[error("Scan worker stopped without reporting a result")]
    WorkerDisconnected,
}

/// Per-file errors that occur while copying or moving photos
#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("Source file not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Failed to create folder {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy verification failed for {path}: source {expected} bytes, destination {actual} bytes")]
    VerificationFailed {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

/// Problems with what the user asked for. Raised before any state changes.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Please select source folders first.")]
    NoSourceFolders,

    #[error("Please select target folder first.")]
    NoTargetFolder,

    #[error("Please select files to move or copy (camera groups, lens groups, or individual files).")]
    EmptySelection,

    #[error("Source folder already added: {path}")]
    DuplicateSourceFolder { path: PathBuf },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, GearViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn relocate_error_includes_both_paths() {
        let error = RelocateError::Copy {
            from: PathBuf::from("/photos/a.jpg"),
            to: PathBuf::from("/sorted/Canon/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/a.jpg"));
        assert!(message.contains("/sorted/Canon/a.jpg"));
    }

    #[test]
    fn input_error_converts_to_top_level() {
        let error: GearViewError = InputError::NoTargetFolder.into();
        assert!(matches!(error, GearViewError::Input(InputError::NoTargetFolder)));
        assert!(error.to_string().contains("target folder"));
    }

    #[test]
    fn failed_scan_outcome_is_not_a_config_error() {
        let error = GearViewError::ScanFailed("Directory not found: /gone".to_string());
        assert_eq!(
            error.to_string(),
            "An error occurred during scanning: Directory not found: /gone"
        );
    }
}
