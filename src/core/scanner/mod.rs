//! # Scanner Module
//!
//! Discovers JPEG photos in source folders and groups them by camera and
//! lens.
//!
//! ## Rules
//! - Extensions `.jpg` / `.jpeg`, any case
//! - Source folders in the order given, each walked recursively in
//!   file-name order
//! - Only the first file with a given file name is kept, even when a
//!   later one lives in another folder and has different content
//!
//! ## Example
//! ```rust,ignore
//! use gearview::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let output = scanner.scan(&["/Users/photos".into()])?;
//! println!("{}", output.grouping.summary());
//! ```

mod filter;
mod walker;
mod worker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};
pub use worker::{ScanHandle, ScanWorker};

#[cfg(test)]
pub(crate) use worker::tests::GatedScanner;

use crate::core::grouping::Grouping;
use crate::error::ScanError;
use crate::events::EventSender;
use std::path::PathBuf;

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Photos grouped by camera and lens
    pub grouping: Grouping,
    /// Errors that occurred during scanning (non-fatal)
    pub warnings: Vec<ScanError>,
}

impl ScanOutput {
    /// Number of unique photos grouped
    pub fn file_count(&self) -> usize {
        self.grouping.file_count()
    }
}

/// Trait for photo scanners
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait PhotoScanner: Send + Sync {
    /// Scan directories and group the photos found
    fn scan(&self, paths: &[PathBuf]) -> Result<ScanOutput, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanOutput, ScanError>;
}
