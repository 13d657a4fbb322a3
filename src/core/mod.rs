//! # Core Module
//!
//! The GUI-agnostic grouping and relocation engine.
//!
//! ## Modules
//! - `metadata` - Reads EXIF tags from photos
//! - `resolver` - Derives camera and lens labels from tags
//! - `scanner` - Discovers photos and groups them, in the background if asked
//! - `grouping` - Camera → lens → files structure and its display order
//! - `relocate` - Copies or moves selected photos into camera/lens folders

pub mod grouping;
pub mod metadata;
pub mod relocate;
pub mod resolver;
pub mod scanner;

// Re-export commonly used types
pub use grouping::{CameraView, FileRecord, Grouping, LensView, SortMode};
pub use metadata::{ExifMetadataReader, MetadataReader, TagMap, TagValue};
pub use relocate::{sanitize, Action, RelocateResult, Selection, SelectionItem};
pub use resolver::{resolve_camera, resolve_lens, NO_CAMERA_INFO, NO_LENS_INFO};
pub use scanner::{PhotoScanner, ScanConfig, ScanOutput, WalkDirScanner};
