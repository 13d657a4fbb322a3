//! Directory walking implementation using walkdir.

use super::{filter::is_hidden, filter::ImageFilter, PhotoScanner, ScanOutput};
use crate::core::grouping::FileRecord;
use crate::core::metadata::{ExifMetadataReader, MetadataReader};
use crate::core::resolver::{resolve_camera, resolve_lens};
use crate::error::ScanError;
use crate::events::{null_sender, EventSender, ScanEvent, ScanProgress};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Extensions to include, case-insensitive
    pub extensions: Vec<String>,
    /// How often the foreground checks a background scan for completion
    pub poll_interval: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            extensions: super::filter::JPEG_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
    reader: Arc<dyn MetadataReader>,
}

impl WalkDirScanner {
    /// Scanner reading EXIF with kamadak-exif
    pub fn new(config: ScanConfig) -> Self {
        Self::with_reader(config, Arc::new(ExifMetadataReader))
    }

    /// Scanner with a custom metadata reader
    pub fn with_reader(config: ScanConfig, reader: Arc<dyn MetadataReader>) -> Self {
        let filter = ImageFilter::new()
            .with_hidden(config.include_hidden)
            .with_extensions(config.extensions.clone());

        Self {
            config,
            filter,
            reader,
        }
    }

    fn check_root(root: &Path) -> Result<(), ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Walk one source folder, adding unseen file names to the grouping
    fn scan_directory(
        &self,
        root: &Path,
        seen: &mut HashMap<OsString, PathBuf>,
        output: &mut ScanOutput,
        events: &EventSender,
    ) {
        let include_hidden = self.config.include_hidden;
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| include_hidden || e.depth() == 0 || !is_hidden(e.path()));

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    warn!(path = %path.display(), error = %error, "skipping unreadable entry");
                    events.scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    });
                    output.warnings.push(error);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            if !self.filter.should_include(path) {
                continue;
            }

            // First file with a given name wins, across all source folders
            let name = entry.file_name().to_os_string();
            if let Some(kept) = seen.get(&name) {
                debug!(path = %path.display(), kept = %kept.display(), "skipping same-named file");
                events.scan(ScanEvent::DuplicateSkipped {
                    path: path.to_path_buf(),
                    kept: kept.clone(),
                });
                continue;
            }
            seen.insert(name, path.to_path_buf());

            let tags = self.reader.read(path);
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            output.grouping.insert(FileRecord {
                path: path.to_path_buf(),
                camera: resolve_camera(&tags),
                lens: resolve_lens(&tags),
                modified,
            });

            events.scan(ScanEvent::Progress(ScanProgress {
                photos_found: output.grouping.file_count(),
                current_path: path.to_path_buf(),
            }));
        }
    }
}

impl PhotoScanner for WalkDirScanner {
    fn scan(&self, paths: &[PathBuf]) -> Result<ScanOutput, ScanError> {
        self.scan_with_events(paths, &null_sender())
    }

    fn scan_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanOutput, ScanError> {
        events.scan(ScanEvent::Started {
            paths: paths.to_vec(),
        });

        let roots: Vec<PathBuf> = paths
            .iter()
            .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.clone()))
            .collect();

        // An unusable root aborts before anything is grouped
        for root in &roots {
            Self::check_root(root)?;
        }

        let mut output = ScanOutput::default();
        let mut seen: HashMap<OsString, PathBuf> = HashMap::new();

        for root in &roots {
            self.scan_directory(root, &mut seen, &mut output, events);
        }

        info!(
            files = output.file_count(),
            cameras = output.grouping.camera_count(),
            lens_groups = output.grouping.lens_group_count(),
            warnings = output.warnings.len(),
            "scan finished"
        );
        events.scan(ScanEvent::Completed {
            total_photos: output.file_count(),
        });

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::fake::FakeReader;
    use crate::events::{Event, EventChannel};
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_photo(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_grouping() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(&[temp_dir.path().to_path_buf()]).unwrap();

        assert!(result.grouping.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn scan_groups_by_camera_and_lens() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "a.jpg");
        create_test_photo(temp_dir.path(), "b.JPG");
        create_test_photo(temp_dir.path(), "c.jpeg");

        let reader = FakeReader::new(&[
            ("a.jpg", "X100", "Fixed"),
            ("b.JPG", "X100", "Fixed"),
            ("c.jpeg", "EOS R5", "RF 50mm"),
        ]);
        let scanner = WalkDirScanner::with_reader(ScanConfig::default(), reader);
        let result = scanner.scan(&[temp_dir.path().to_path_buf()]).unwrap();

        assert_eq!(result.file_count(), 3);
        assert_eq!(result.grouping.lens("X100", "Fixed").unwrap().files.len(), 2);
        assert_eq!(result.grouping.lens("EOS R5", "RF 50mm").unwrap().files.len(), 1);
    }

    #[test]
    fn files_without_metadata_get_sentinel_labels() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "plain.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&[temp_dir.path().to_path_buf()]).unwrap();

        assert!(result.grouping.lens("No camera info", "No lens info").is_some());
    }

    #[test]
    fn scan_excludes_non_jpeg_files() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "photo.jpg");
        create_test_photo(temp_dir.path(), "photo.png");
        File::create(temp_dir.path().join("notes.txt")).unwrap();

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&[temp_dir.path().to_path_buf()]).unwrap();

        assert_eq!(result.file_count(), 1);
    }

    #[test]
    fn scan_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("2024").join("trip");
        fs::create_dir_all(&nested).unwrap();
        create_test_photo(temp_dir.path(), "root.jpg");
        create_test_photo(&nested, "nested.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&[temp_dir.path().to_path_buf()]).unwrap();

        assert_eq!(result.file_count(), 2);
    }

    #[test]
    fn same_name_in_second_folder_is_skipped() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let kept = create_test_photo(first.path(), "IMG_0001.jpg");
        create_test_photo(second.path(), "IMG_0001.jpg");
        create_test_photo(second.path(), "IMG_0002.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner
            .scan(&[first.path().to_path_buf(), second.path().to_path_buf()])
            .unwrap();

        assert_eq!(result.file_count(), 2);
        let named: Vec<_> = result
            .grouping
            .files()
            .filter(|r| r.path.ends_with("IMG_0001.jpg"))
            .collect();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].path, std::path::absolute(&kept).unwrap());
    }

    #[test]
    fn same_name_in_subfolder_keeps_walk_order_first() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        let kept = create_test_photo(&a, "dup.jpg");
        create_test_photo(&b, "dup.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&[temp_dir.path().to_path_buf()]).unwrap();

        assert_eq!(result.file_count(), 1);
        let record = result.grouping.files().next().unwrap();
        assert_eq!(record.path, std::path::absolute(&kept).unwrap());
    }

    #[test]
    fn scan_can_exclude_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".thumbnails");
        fs::create_dir_all(&hidden).unwrap();
        create_test_photo(&hidden, "thumb.jpg");
        create_test_photo(temp_dir.path(), "visible.jpg");

        let config = ScanConfig {
            include_hidden: false,
            ..Default::default()
        };
        let result = WalkDirScanner::new(config)
            .scan(&[temp_dir.path().to_path_buf()])
            .unwrap();
        assert_eq!(result.file_count(), 1);

        let result = WalkDirScanner::new(ScanConfig::default())
            .scan(&[temp_dir.path().to_path_buf()])
            .unwrap();
        assert_eq!(result.file_count(), 2);
    }

    #[test]
    fn scan_nonexistent_directory_aborts() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "photo.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&[
            temp_dir.path().to_path_buf(),
            PathBuf::from("/nonexistent/path/12345"),
        ]);

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn scan_reports_events() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "a.jpg");

        let (sender, receiver) = EventChannel::new();
        let scanner = WalkDirScanner::new(ScanConfig::default());
        scanner
            .scan_with_events(&[temp_dir.path().to_path_buf()], &sender)
            .unwrap();
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(events.first(), Some(Event::Scan(ScanEvent::Started { .. }))));
        assert!(matches!(
            events.last(),
            Some(Event::Scan(ScanEvent::Completed { total_photos: 1 }))
        ));
    }
}
