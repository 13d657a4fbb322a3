//! Display ordering of a grouping.

use super::{FileRecord, Grouping};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How cameras and lenses are ordered for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Most photos first
    #[default]
    ByCount,
    /// Alphabetical, ignoring case
    ByName,
}

/// A lens group in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensView {
    pub label: String,
    /// Newest first
    pub files: Vec<FileRecord>,
}

/// A camera group in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraView {
    pub label: String,
    pub file_count: usize,
    pub lenses: Vec<LensView>,
}

fn by_label(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl Grouping {
    /// Cameras, lenses and files in display order.
    ///
    /// Sorts are stable, so ties keep insertion order.
    pub fn ordered(&self, mode: SortMode) -> Vec<CameraView> {
        let mut cameras: Vec<CameraView> = self
            .cameras()
            .iter()
            .map(|camera| {
                let mut lenses: Vec<LensView> = camera
                    .lenses
                    .iter()
                    .map(|lens| {
                        let mut files = lens.files.clone();
                        files.sort_by(|a, b| b.modified.cmp(&a.modified));
                        LensView {
                            label: lens.label.clone(),
                            files,
                        }
                    })
                    .collect();

                match mode {
                    SortMode::ByCount => lenses.sort_by(|a, b| b.files.len().cmp(&a.files.len())),
                    SortMode::ByName => lenses.sort_by(|a, b| by_label(&a.label, &b.label)),
                }

                CameraView {
                    label: camera.label.clone(),
                    file_count: camera.file_count(),
                    lenses,
                }
            })
            .collect();

        match mode {
            SortMode::ByCount => cameras.sort_by(|a, b| b.file_count.cmp(&a.file_count)),
            SortMode::ByName => cameras.sort_by(|a, b| by_label(&a.label, &b.label)),
        }

        cameras
    }
}
