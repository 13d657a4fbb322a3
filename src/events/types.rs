//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the scanner and relocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Copy/move events
    Relocate(RelocateEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { paths: Vec<PathBuf> },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// A file was skipped because an earlier file had the same name
    DuplicateSkipped { path: PathBuf, kept: PathBuf },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_photos: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of unique photos grouped so far
    pub photos_found: usize,
    /// Photo currently being analyzed
    pub current_path: PathBuf,
}

/// Events while copying or moving photos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RelocateEvent {
    /// A batch has started
    Started { total_files: usize },
    /// One file was copied or moved
    FileDone {
        completed: usize,
        total: usize,
        source: PathBuf,
        destination: PathBuf,
    },
    /// One file failed, the batch continues
    FileFailed { source: PathBuf, message: String },
    /// The batch finished
    Completed { succeeded: usize, failed: usize },
}

/// The single completion message a background scan reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The scan finished and its grouping is installed
    Success(String),
    /// The scan aborted; nothing was published
    Error(String),
}

impl ScanOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanOutcome::Success(_))
    }

    /// Summary or error text
    pub fn message(&self) -> &str {
        match self {
            ScanOutcome::Success(m) | ScanOutcome::Error(m) => m,
        }
    }
}
