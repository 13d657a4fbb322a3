//! # Grouping Module
//!
//! Two-level grouping of scanned photos: camera label → lens label → files.
//!
//! Cameras, lenses and files keep the order they were inserted in (scan
//! order). Display order is computed separately by [`Grouping::ordered`].

mod order;

pub use order::{CameraView, LensView, SortMode};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A scanned photo and the labels it was grouped under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path to the photo file
    pub path: PathBuf,
    /// Resolved camera label
    pub camera: String,
    /// Resolved lens label
    pub lens: String,
    /// Last modified time
    #[serde(with = "rfc3339")]
    pub modified: SystemTime,
}

/// `SystemTime` as an RFC 3339 string; pre-1970 times included
mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::SystemTime;

    pub fn serialize<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
        DateTime::<Utc>::from(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
        DateTime::<Utc>::deserialize(deserializer).map(SystemTime::from)
    }
}

/// All photos taken with one lens on one camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensGroup {
    pub label: String,
    pub files: Vec<FileRecord>,
}

/// All lens groups of one camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraGroup {
    pub label: String,
    pub lenses: Vec<LensGroup>,
}

impl CameraGroup {
    /// Total files across all lenses
    pub fn file_count(&self) -> usize {
        self.lenses.iter().map(|l| l.files.len()).sum()
    }

    /// Find a lens group by label
    pub fn lens(&self, label: &str) -> Option<&LensGroup> {
        self.lenses.iter().find(|l| l.label == label)
    }
}

/// Camera → lens → files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grouping {
    cameras: Vec<CameraGroup>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its camera/lens bucket, creating buckets as needed
    pub fn insert(&mut self, record: FileRecord) {
        let camera_idx = match self.cameras.iter().position(|c| c.label == record.camera) {
            Some(idx) => idx,
            None => {
                self.cameras.push(CameraGroup {
                    label: record.camera.clone(),
                    lenses: Vec::new(),
                });
                self.cameras.len() - 1
            }
        };
        let camera = &mut self.cameras[camera_idx];

        let lens_idx = match camera.lenses.iter().position(|l| l.label == record.lens) {
            Some(idx) => idx,
            None => {
                camera.lenses.push(LensGroup {
                    label: record.lens.clone(),
                    files: Vec::new(),
                });
                camera.lenses.len() - 1
            }
        };

        camera.lenses[lens_idx].files.push(record);
    }

    /// Camera groups in insertion order
    pub fn cameras(&self) -> &[CameraGroup] {
        &self.cameras
    }

    pub fn camera(&self, label: &str) -> Option<&CameraGroup> {
        self.cameras.iter().find(|c| c.label == label)
    }

    pub fn lens(&self, camera: &str, lens: &str) -> Option<&LensGroup> {
        self.camera(camera).and_then(|c| c.lens(lens))
    }

    /// Look up the record for a scanned file
    pub fn find_file(&self, path: &Path) -> Option<&FileRecord> {
        self.files().find(|r| r.path == path)
    }

    /// Every record, camera by camera, lens by lens
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.cameras
            .iter()
            .flat_map(|c| c.lenses.iter())
            .flat_map(|l| l.files.iter())
    }

    pub fn file_count(&self) -> usize {
        self.cameras.iter().map(CameraGroup::file_count).sum()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn lens_group_count(&self) -> usize {
        self.cameras.iter().map(|c| c.lenses.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn clear(&mut self) {
        self.cameras.clear();
    }

    /// One-line summary shown after a scan
    pub fn summary(&self) -> String {
        format!(
            "Analysis complete: {} unique JPG files processed. {} cameras, {} lens groups.",
            self.file_count(),
            self.camera_count(),
            self.lens_group_count()
        )
    }
}
