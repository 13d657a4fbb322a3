//! # Session Module
//!
//! Owns everything one interactive session works with: source folders, the
//! target folder, the current grouping and the scan running in the
//! background.
//!
//! ## Lifecycle
//! 1. Add source folders and pick a target
//! 2. [`Session::start_scan`], then [`Session::poll_scan`] until it reports
//! 3. Render [`Session::ordered`]
//! 4. [`Session::relocate`] a selection; a move re-scans automatically
//!
//! All methods run on the caller's thread except the scan itself. The
//! grouping is replaced only when the caller drains the scan result.

use crate::core::grouping::{CameraView, Grouping, SortMode};
use crate::core::metadata::{ExifMetadataReader, MetadataReader};
use crate::core::relocate::{Action, RelocateExecutor, RelocatePlan, RelocatePlanner, RelocateResult, Selection};
use crate::core::scanner::{
    PhotoScanner, ScanConfig, ScanHandle, ScanOutput, ScanWorker, WalkDirScanner,
};
use crate::error::{InputError, Result, ScanError};
use crate::events::{null_sender, EventSender, ScanOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Builder for a [`Session`]
pub struct SessionBuilder {
    config: ScanConfig,
    scanner: Option<Arc<dyn PhotoScanner>>,
    reader: Option<Arc<dyn MetadataReader>>,
    events: Option<EventSender>,
    sort_mode: SortMode,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
            scanner: None,
            reader: None,
            events: None,
            sort_mode: SortMode::default(),
        }
    }

    /// Set the scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom metadata reader with the default scanner
    pub fn reader(mut self, reader: Arc<dyn MetadataReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Replace the scanner entirely
    pub fn scanner(mut self, scanner: Arc<dyn PhotoScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Send scan and relocation events to `events`
    pub fn events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn sort_mode(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }

    pub fn build(self) -> Session {
        let SessionBuilder {
            config,
            scanner,
            reader,
            events,
            sort_mode,
        } = self;

        let scanner = scanner.unwrap_or_else(|| {
            let reader =
                reader.unwrap_or_else(|| Arc::new(ExifMetadataReader) as Arc<dyn MetadataReader>);
            Arc::new(WalkDirScanner::with_reader(config.clone(), reader)) as Arc<dyn PhotoScanner>
        });

        Session {
            config,
            scanner,
            events: events.unwrap_or_else(null_sender),
            source_folders: Vec::new(),
            target_folder: None,
            grouping: Grouping::new(),
            sort_mode,
            scan: None,
            last_outcome: None,
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one interactive session
pub struct Session {
    config: ScanConfig,
    scanner: Arc<dyn PhotoScanner>,
    events: EventSender,
    source_folders: Vec<PathBuf>,
    target_folder: Option<PathBuf>,
    grouping: Grouping,
    sort_mode: SortMode,
    scan: Option<ScanHandle>,
    last_outcome: Option<ScanOutcome>,
}

impl Session {
    /// Session with default configuration
    pub fn new() -> Self {
        SessionBuilder::new().build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Add a source folder. Adding the same folder twice is rejected.
    pub fn add_source_folder(&mut self, folder: impl Into<PathBuf>) -> Result<()> {
        let folder = folder.into();
        if self.source_folders.contains(&folder) {
            return Err(InputError::DuplicateSourceFolder { path: folder }.into());
        }
        self.source_folders.push(folder);
        Ok(())
    }

    /// Remove source folders by position. Out-of-range indices are ignored.
    pub fn remove_source_folders(&mut self, indices: &[usize]) {
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();
        // Back to front so earlier removals don't shift later ones
        for index in indices.into_iter().rev() {
            if index < self.source_folders.len() {
                self.source_folders.remove(index);
            }
        }
    }

    pub fn source_folders(&self) -> &[PathBuf] {
        &self.source_folders
    }

    pub fn set_target_folder(&mut self, folder: impl Into<PathBuf>) {
        self.target_folder = Some(folder.into());
    }

    pub fn target_folder(&self) -> Option<&Path> {
        self.target_folder.as_deref()
    }

    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Current grouping in the current sort mode
    pub fn ordered(&self) -> Vec<CameraView> {
        self.grouping.ordered(self.sort_mode)
    }

    /// Forget the current scan results
    pub fn clear_results(&mut self) {
        self.grouping.clear();
        self.last_outcome = None;
    }

    /// Whether a background scan is in flight
    pub fn is_scanning(&self) -> bool {
        self.scan.is_some()
    }

    /// Most recent scan outcome
    pub fn last_scan_outcome(&self) -> Option<&ScanOutcome> {
        self.last_outcome.as_ref()
    }

    /// Start scanning the source folders in the background.
    ///
    /// The current grouping is cleared immediately; the new one becomes
    /// visible once [`Session::poll_scan`] drains the result.
    pub fn start_scan(&mut self) -> Result<()> {
        if self.source_folders.is_empty() {
            return Err(InputError::NoSourceFolders.into());
        }
        if self.scan.is_some() {
            return Err(ScanError::AlreadyRunning.into());
        }

        info!(folders = self.source_folders.len(), "starting scan");
        self.grouping.clear();
        self.scan = Some(ScanWorker::spawn(
            Arc::clone(&self.scanner),
            self.source_folders.clone(),
            self.events.clone(),
        ));
        Ok(())
    }

    /// Check whether the background scan has finished.
    ///
    /// Returns `None` while the scan is running or when none was started.
    pub fn poll_scan(&mut self) -> Option<ScanOutcome> {
        let result = self.scan.as_ref()?.try_outcome()?;
        self.scan = None;
        Some(self.finish_scan(result))
    }

    /// Block until the running scan reports, polling on the configured
    /// interval
    pub fn wait_for_scan(&mut self) -> Option<ScanOutcome> {
        let handle = self.scan.take()?;
        let result = handle.wait(self.config.poll_interval);
        Some(self.finish_scan(result))
    }

    /// How often callers should poll a running scan
    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval
    }

    fn finish_scan(&mut self, result: std::result::Result<ScanOutput, ScanError>) -> ScanOutcome {
        let outcome = match result {
            Ok(output) => {
                self.grouping = output.grouping;
                ScanOutcome::Success(self.grouping.summary())
            }
            Err(e) => {
                warn!(error = %e, "scan failed");
                ScanOutcome::Error(e.to_string())
            }
        };

        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Start a scan and wait for it
    pub fn scan(&mut self) -> Result<ScanOutcome> {
        self.start_scan()?;
        Ok(self
            .wait_for_scan()
            .unwrap_or_else(|| ScanOutcome::Error(ScanError::WorkerDisconnected.to_string())))
    }

    /// Preview where a selection would go without touching any file
    pub fn plan(&self, selection: &Selection, organize_by_lens: bool) -> Result<RelocatePlan> {
        let target = self.check_relocation_input(selection)?;
        Ok(RelocatePlanner::plan(&self.grouping, selection, target, organize_by_lens))
    }

    /// Copy or move the selection into the target folder.
    ///
    /// Runs on the caller's thread. After a move, the source folders are
    /// scanned again so the grouping no longer lists moved photos.
    pub fn relocate(
        &mut self,
        selection: &Selection,
        action: Action,
        organize_by_lens: bool,
    ) -> Result<RelocateResult> {
        let plan = self.plan(selection, organize_by_lens)?;
        if plan.files.is_empty() {
            return Err(InputError::EmptySelection.into());
        }

        let result = RelocateExecutor::execute(&plan, action, &self.events);

        if action == Action::Move {
            if self.source_folders.is_empty() {
                self.grouping.clear();
            } else {
                let outcome = self.scan()?;
                info!(outcome = outcome.message(), "re-scanned after move");
            }
        }

        Ok(result)
    }

    fn check_relocation_input(&self, selection: &Selection) -> Result<&Path> {
        let target = self
            .target_folder
            .as_deref()
            .ok_or(InputError::NoTargetFolder)?;
        if selection.is_empty() {
            return Err(InputError::EmptySelection.into());
        }
        if self.scan.is_some() {
            return Err(ScanError::AlreadyRunning.into());
        }
        Ok(target)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
