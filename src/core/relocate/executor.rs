//! Executor for relocation plans.

use super::types::*;
use crate::error::RelocateError;
use crate::events::{EventSender, RelocateEvent};
use filetime::FileTime;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Executes relocation plans
pub struct RelocateExecutor;

impl RelocateExecutor {
    /// Copy or move every planned file.
    ///
    /// Each file is attempted once; a failure is recorded and the batch
    /// moves on to the next file.
    pub fn execute(plan: &RelocatePlan, action: Action, events: &EventSender) -> RelocateResult {
        let start = Instant::now();
        let mut result = RelocateResult::default();
        let mut created_dirs: HashSet<PathBuf> = HashSet::new();

        events.relocate(RelocateEvent::Started {
            total_files: plan.total_files,
        });

        for file in &plan.files {
            match Self::relocate_one(file, action, &mut created_dirs, &mut result.folders_created) {
                Ok(destination) => {
                    result.succeeded += 1;
                    events.relocate(RelocateEvent::FileDone {
                        completed: result.succeeded,
                        total: plan.total_files,
                        source: file.source.clone(),
                        destination: destination.clone(),
                    });
                    result.relocated.push(RelocatedFile {
                        source: file.source.clone(),
                        destination,
                    });
                }
                Err(e) => {
                    warn!(source = %file.source.display(), error = %e, "{} failed", action);
                    result.failed += 1;
                    events.relocate(RelocateEvent::FileFailed {
                        source: file.source.clone(),
                        message: e.to_string(),
                    });
                    result.errors.push(e.to_string());
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            action = %action,
            succeeded = result.succeeded,
            failed = result.failed,
            folders_created = result.folders_created,
            "relocation finished"
        );
        events.relocate(RelocateEvent::Completed {
            succeeded: result.succeeded,
            failed: result.failed,
        });

        result
    }

    fn relocate_one(
        file: &PlannedFile,
        action: Action,
        created_dirs: &mut HashSet<PathBuf>,
        folders_created: &mut usize,
    ) -> Result<PathBuf, RelocateError> {
        if !file.source.exists() {
            return Err(RelocateError::SourceMissing {
                path: file.source.clone(),
            });
        }

        let folder = file.destination.parent().unwrap_or(Path::new(""));
        if !created_dirs.contains(folder) {
            let existed = folder.is_dir();
            fs::create_dir_all(folder).map_err(|source| RelocateError::CreateDirectory {
                path: folder.to_path_buf(),
                source,
            })?;
            if !existed {
                *folders_created += 1;
            }
            created_dirs.insert(folder.to_path_buf());
        }

        let file_name = file
            .destination
            .file_name()
            .unwrap_or(OsStr::new("unknown"));
        let destination = unique_destination(folder, file_name);

        match action {
            Action::Copy => {
                copy_preserving(&file.source, &destination).map_err(|source| RelocateError::Copy {
                    from: file.source.clone(),
                    to: destination.clone(),
                    source,
                })?
            }
            Action::Move => move_file(&file.source, &destination)?,
        }

        Ok(destination)
    }
}

/// First free path among `name.ext`, `name(1).ext`, `name(2).ext`, ...
pub fn unique_destination(folder: &Path, file_name: &OsStr) -> PathBuf {
    let candidate = folder.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(file_name);
    let stem = as_path.file_stem().unwrap_or(file_name);
    let ext = as_path.extension();

    let mut counter = 1usize;
    loop {
        let mut name = stem.to_os_string();
        name.push(format!("({})", counter));
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }

        let candidate = folder.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Copy contents, then carry over timestamps and permissions.
///
/// Refuses to write over an existing destination. Only the content copy
/// can fail; metadata the target filesystem rejects is logged and skipped.
fn copy_preserving(source: &Path, destination: &Path) -> io::Result<()> {
    let mut input = File::open(source)?;
    let metadata = input.metadata()?;
    let mut output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)?;

    let copied = io::copy(&mut input, &mut output).and_then(|_| output.sync_all());
    drop(output);

    if let Err(e) = copied {
        let _ = fs::remove_file(destination);
        return Err(e);
    }

    preserve_metadata(destination, &metadata);
    Ok(())
}

/// Apply `metadata`'s times and permissions to `destination`.
///
/// Returns whether everything was applied. FAT and SMB targets commonly
/// refuse permission changes.
fn preserve_metadata(destination: &Path, metadata: &fs::Metadata) -> bool {
    let mut applied = true;

    if let Err(e) = filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(metadata),
        FileTime::from_last_modification_time(metadata),
    ) {
        warn!(path = %destination.display(), error = %e, "could not preserve file times");
        applied = false;
    }
    if let Err(e) = fs::set_permissions(destination, metadata.permissions()) {
        warn!(path = %destination.display(), error = %e, "could not preserve permissions");
        applied = false;
    }

    applied
}

fn move_file(source: &Path, destination: &Path) -> Result<(), RelocateError> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(source = %source.display(), "rename crosses filesystems, copying instead");
            copy_then_remove(source, destination)
        }
        Err(e) => Err(RelocateError::Move {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            source: e,
        }),
    }
}

/// Move by copy, size check and delete.
///
/// On any failure after the copy the new destination is removed again, so
/// the photo exists exactly once.
fn copy_then_remove(source: &Path, destination: &Path) -> Result<(), RelocateError> {
    let move_error = |e: io::Error| RelocateError::Move {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    };

    let source_size = fs::metadata(source).map_err(move_error)?.len();
    // create_new: an existing destination is never ours to remove
    copy_preserving(source, destination).map_err(move_error)?;

    let dest_size = match fs::metadata(destination) {
        Ok(m) => m.len(),
        Err(e) => {
            let _ = fs::remove_file(destination);
            return Err(move_error(e));
        }
    };
    if dest_size != source_size {
        let _ = fs::remove_file(destination);
        return Err(RelocateError::VerificationFailed {
            path: source.to_path_buf(),
            expected: source_size,
            actual: dest_size,
        });
    }

    if let Err(e) = fs::remove_file(source) {
        warn!(source = %source.display(), error = %e, "source not removable, rolling back copy");
        let _ = fs::remove_file(destination);
        return Err(move_error(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::null_sender;
    use std::ffi::OsString;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::File::create(path).unwrap().write_all(content).unwrap();
    }

    fn plan_for(files: Vec<(PathBuf, PathBuf)>) -> RelocatePlan {
        let files: Vec<PlannedFile> = files
            .into_iter()
            .map(|(source, destination)| PlannedFile {
                source,
                destination,
                camera: "Cam".to_string(),
                lens: "Lens".to_string(),
                organize_by_lens: true,
            })
            .collect();
        RelocatePlan {
            id: "test".to_string(),
            total_files: files.len(),
            files,
            unmatched: vec![],
        }
    }

    #[test]
    fn test_execute_copy() {
        let temp_src = TempDir::new().unwrap();
        let temp_dest = TempDir::new().unwrap();
        let src_file = temp_src.path().join("test.jpg");
        write_file(&src_file, b"test content");

        let dest = temp_dest.path().join("Cam/Lens/test.jpg");
        let plan = plan_for(vec![(src_file.clone(), dest.clone())]);

        let result = RelocateExecutor::execute(&plan, Action::Copy, &null_sender());

        assert_eq!(result.counts(), (1, 0));
        assert_eq!(result.folders_created, 1);
        assert!(src_file.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"test content");
    }

    #[test]
    fn test_copy_preserves_modified_time() {
        let temp_src = TempDir::new().unwrap();
        let temp_dest = TempDir::new().unwrap();
        let src_file = temp_src.path().join("old.jpg");
        write_file(&src_file, b"old");
        let old = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src_file, old).unwrap();

        let dest = temp_dest.path().join("Cam/old.jpg");
        let plan = plan_for(vec![(src_file, dest.clone())]);
        RelocateExecutor::execute(&plan, Action::Copy, &null_sender());

        let copied = fs::metadata(&dest).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&copied), old);
    }

    #[test]
    fn test_execute_move() {
        let temp_src = TempDir::new().unwrap();
        let temp_dest = TempDir::new().unwrap();
        let src_file = temp_src.path().join("test.jpg");
        write_file(&src_file, b"test content");

        let dest = temp_dest.path().join("Cam/Lens/test.jpg");
        let plan = plan_for(vec![(src_file.clone(), dest.clone())]);

        let result = RelocateExecutor::execute(&plan, Action::Move, &null_sender());

        assert_eq!(result.succeeded, 1);
        assert!(!src_file.exists());
        assert!(dest.exists());
    }

    #[test]
    fn test_collision_adds_counter() {
        let temp_src = TempDir::new().unwrap();
        let temp_dest = TempDir::new().unwrap();
        let first = temp_src.path().join("one/img.jpg");
        let second = temp_src.path().join("two/img.jpg");
        write_file(&first, b"first");
        write_file(&second, b"second");

        let dest = temp_dest.path().join("Cam/Lens/img.jpg");
        let plan = plan_for(vec![(first, dest.clone()), (second, dest.clone())]);

        let result = RelocateExecutor::execute(&plan, Action::Copy, &null_sender());

        assert_eq!(result.counts(), (2, 0));
        assert_eq!(fs::read(&dest).unwrap(), b"first");
        assert_eq!(
            fs::read(temp_dest.path().join("Cam/Lens/img(1).jpg")).unwrap(),
            b"second"
        );
    }

    #[test]
    fn test_existing_destination_is_never_overwritten() {
        let temp_src = TempDir::new().unwrap();
        let temp_dest = TempDir::new().unwrap();
        let src_file = temp_src.path().join("img.jpg");
        write_file(&src_file, b"new");
        write_file(&temp_dest.path().join("Cam/img.jpg"), b"keep me");
        write_file(&temp_dest.path().join("Cam/img(1).jpg"), b"keep me too");

        let plan = plan_for(vec![(src_file, temp_dest.path().join("Cam/img.jpg"))]);
        let result = RelocateExecutor::execute(&plan, Action::Move, &null_sender());

        assert_eq!(result.relocated[0].destination, temp_dest.path().join("Cam/img(2).jpg"));
        assert_eq!(fs::read(temp_dest.path().join("Cam/img.jpg")).unwrap(), b"keep me");
        assert_eq!(fs::read(temp_dest.path().join("Cam/img(1).jpg")).unwrap(), b"keep me too");
    }

    #[test]
    fn test_execute_missing_source_continues_batch() {
        let temp_src = TempDir::new().unwrap();
        let temp_dest = TempDir::new().unwrap();
        let real = temp_src.path().join("real.jpg");
        write_file(&real, b"x");

        let plan = plan_for(vec![
            (PathBuf::from("/nonexistent/file.jpg"), temp_dest.path().join("Cam/file.jpg")),
            (real, temp_dest.path().join("Cam/real.jpg")),
        ]);

        let result = RelocateExecutor::execute(&plan, Action::Copy, &null_sender());

        assert_eq!(result.counts(), (1, 1));
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("/nonexistent/file.jpg"));
    }

    #[test]
    fn metadata_failure_does_not_fail_the_copy() {
        let temp = TempDir::new().unwrap();
        let src_file = temp.path().join("a.jpg");
        write_file(&src_file, b"pixels");
        let metadata = fs::metadata(&src_file).unwrap();

        assert!(preserve_metadata(&src_file, &metadata));
        assert!(!preserve_metadata(&temp.path().join("gone.jpg"), &metadata));

        let dest = temp.path().join("b.jpg");
        copy_preserving(&src_file, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn failed_rename_does_not_copy() {
        let temp = TempDir::new().unwrap();
        let src_file = temp.path().join("a.jpg");
        write_file(&src_file, b"pixels");
        let dest = temp.path().join("missing-dir/a.jpg");

        let err = move_file(&src_file, &dest).unwrap_err();

        assert!(matches!(err, RelocateError::Move { .. }));
        assert!(src_file.exists());
        assert!(!dest.exists());
    }

    #[test]
    fn copy_then_remove_leaves_existing_destination_alone() {
        let temp = TempDir::new().unwrap();
        let src_file = temp.path().join("src/a.jpg");
        let dest = temp.path().join("dest/a.jpg");
        write_file(&src_file, b"new");
        write_file(&dest, b"already here");

        let err = copy_then_remove(&src_file, &dest).unwrap_err();

        assert!(matches!(err, RelocateError::Move { .. }));
        assert_eq!(fs::read(&src_file).unwrap(), b"new");
        assert_eq!(fs::read(&dest).unwrap(), b"already here");
    }

    #[test]
    fn copy_then_remove_moves_the_file() {
        let temp = TempDir::new().unwrap();
        let src_file = temp.path().join("src/a.jpg");
        let dest = temp.path().join("dest/a.jpg");
        write_file(&src_file, b"pixels");
        fs::create_dir_all(dest.parent().unwrap()).unwrap();

        copy_then_remove(&src_file, &dest).unwrap();

        assert!(!src_file.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn unique_destination_without_extension() {
        let temp = TempDir::new().unwrap();
        write_file(&temp.path().join("README"), b"x");

        let path = unique_destination(temp.path(), &OsString::from("README"));
        assert_eq!(path, temp.path().join("README(1)"));
    }

    #[test]
    fn unique_destination_keeps_dotted_stem() {
        let temp = TempDir::new().unwrap();
        write_file(&temp.path().join("a.b.jpeg"), b"x");

        let path = unique_destination(temp.path(), &OsString::from("a.b.jpeg"));
        assert_eq!(path, temp.path().join("a.b(1).jpeg"));
    }
}
