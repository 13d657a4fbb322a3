//! Types for the relocate module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What to do with each selected photo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Copy files to destination (keep originals)
    #[default]
    Copy,
    /// Move files to destination
    Move,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Copy => write!(f, "Copy"),
            Action::Move => write!(f, "Move"),
        }
    }
}

/// One thing the user picked in the camera/lens tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionItem {
    /// A single scanned photo
    File { path: PathBuf },
    /// Every photo of one lens on one camera
    LensGroup { camera: String, lens: String },
    /// Every photo of one camera
    CameraGroup { camera: String },
}

/// An ordered set of selected items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    items: Vec<SelectionItem>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.items.push(SelectionItem::File { path: path.into() });
        self
    }

    pub fn lens(mut self, camera: impl Into<String>, lens: impl Into<String>) -> Self {
        self.items.push(SelectionItem::LensGroup {
            camera: camera.into(),
            lens: lens.into(),
        });
        self
    }

    pub fn camera(mut self, camera: impl Into<String>) -> Self {
        self.items.push(SelectionItem::CameraGroup {
            camera: camera.into(),
        });
        self
    }

    pub fn push(&mut self, item: SelectionItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the organize-by-lens choice applies to this selection
    pub fn has_camera_group(&self) -> bool {
        self.items
            .iter()
            .any(|i| matches!(i, SelectionItem::CameraGroup { .. }))
    }
}

impl From<Vec<SelectionItem>> for Selection {
    fn from(items: Vec<SelectionItem>) -> Self {
        Self { items }
    }
}

/// A photo scheduled for copy or move
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedFile {
    pub source: PathBuf,
    /// Preferred destination; a `(n)` suffix is added at write time if taken
    pub destination: PathBuf,
    pub camera: String,
    pub lens: String,
    pub organize_by_lens: bool,
}

/// The relocation plan (preview)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocatePlan {
    pub id: String,
    pub files: Vec<PlannedFile>,
    pub total_files: usize,
    /// Selected items that matched nothing in the grouping
    pub unmatched: Vec<SelectionItem>,
}

/// Where one photo ended up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocatedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Result of executing the plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelocateResult {
    pub succeeded: usize,
    pub failed: usize,
    pub folders_created: usize,
    pub relocated: Vec<RelocatedFile>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl RelocateResult {
    /// (success count, failure count)
    pub fn counts(&self) -> (usize, usize) {
        (self.succeeded, self.failed)
    }

    /// Message shown when a batch completes
    pub fn summary(&self, action: Action) -> String {
        format!(
            "{} operation completed.\nSuccess: {} files\nFailed: {} files",
            action, self.succeeded, self.failed
        )
    }
}
