//! Plan generator for copy/move operations.

use super::types::*;
use crate::core::grouping::{FileRecord, Grouping};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;
use uuid::Uuid;

/// Replace characters that are illegal in file and folder names with `_`.
///
/// Covers `< > : " / \ | ? *` and control characters 0x00-0x1F.
pub fn sanitize(name: &str) -> String {
    static ILLEGAL: OnceLock<Regex> = OnceLock::new();
    let re = ILLEGAL.get_or_init(|| {
        Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("sanitize pattern is valid")
    });
    re.replace_all(name, "_").into_owned()
}

/// Folder name for a label; `.` and `..` would escape the target
fn folder_name(label: &str) -> String {
    match sanitize(label).as_str() {
        "." | ".." => "_".to_string(),
        clean => clean.to_string(),
    }
}

/// Expands selections into per-file destinations
pub struct RelocatePlanner;

impl RelocatePlanner {
    /// Build a plan for `selection`.
    ///
    /// `organize_by_lens` only affects camera-group selections; single
    /// files and lens groups always go into a lens subfolder. A file
    /// reachable through several selected items is planned once, using the
    /// first item that reached it.
    pub fn plan(
        grouping: &Grouping,
        selection: &Selection,
        target_root: &Path,
        organize_by_lens: bool,
    ) -> RelocatePlan {
        let mut files = Vec::new();
        let mut unmatched = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for item in selection.items() {
            let expanded = Self::expand(grouping, item, organize_by_lens);
            if expanded.is_empty() {
                warn!(item = ?item, "selection matches nothing in the current scan");
                unmatched.push(item.clone());
                continue;
            }

            for (record, by_lens) in expanded {
                if !seen.insert(record.path.clone()) {
                    continue;
                }
                files.push(Self::plan_file(record, target_root, by_lens));
            }
        }

        RelocatePlan {
            id: Uuid::new_v4().to_string(),
            total_files: files.len(),
            files,
            unmatched,
        }
    }

    fn expand<'a>(
        grouping: &'a Grouping,
        item: &SelectionItem,
        organize_by_lens: bool,
    ) -> Vec<(&'a FileRecord, bool)> {
        match item {
            SelectionItem::File { path } => grouping
                .find_file(path)
                .map(|r| vec![(r, true)])
                .unwrap_or_default(),
            SelectionItem::LensGroup { camera, lens } => grouping
                .lens(camera, lens)
                .map(|l| l.files.iter().map(|r| (r, true)).collect())
                .unwrap_or_default(),
            SelectionItem::CameraGroup { camera } => grouping
                .camera(camera)
                .map(|c| {
                    c.lenses
                        .iter()
                        .flat_map(|l| l.files.iter())
                        .map(|r| (r, organize_by_lens))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    fn plan_file(record: &FileRecord, target_root: &Path, organize_by_lens: bool) -> PlannedFile {
        let folder = Self::destination_dir(target_root, &record.camera, &record.lens, organize_by_lens);
        let file_name = record
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "unknown".into());

        PlannedFile {
            source: record.path.clone(),
            destination: folder.join(file_name),
            camera: record.camera.clone(),
            lens: record.lens.clone(),
            organize_by_lens,
        }
    }

    /// `target/camera` or `target/camera/lens`, both sanitized
    pub fn destination_dir(
        target_root: &Path,
        camera: &str,
        lens: &str,
        organize_by_lens: bool,
    ) -> PathBuf {
        let camera_dir = target_root.join(folder_name(camera));
        if organize_by_lens {
            camera_dir.join(folder_name(lens))
        } else {
            camera_dir
        }
    }
}
