//! Background scan worker.
//!
//! A scan runs on its own thread and reports exactly one result through a
//! bounded crossbeam channel. The caller polls the [`ScanHandle`] until the
//! result arrives. Scans cannot be cancelled once started.

use super::{PhotoScanner, ScanOutput};
use crate::error::ScanError;
use crate::events::EventSender;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error};

type ScanMessage = Result<ScanOutput, ScanError>;

/// Starts background scans
pub struct ScanWorker;

impl ScanWorker {
    /// Run `scanner` over `paths` on a new thread
    pub fn spawn(
        scanner: Arc<dyn PhotoScanner>,
        paths: Vec<PathBuf>,
        events: EventSender,
    ) -> ScanHandle {
        let (sender, receiver) = bounded::<ScanMessage>(1);

        let spawned = thread::Builder::new()
            .name("gearview-scan".to_string())
            .spawn(move || {
                let result = scanner.scan_with_events(&paths, &events);
                // The handle may already be gone; nothing left to report to
                let _ = sender.send(result);
            });

        if let Err(e) = spawned {
            // The sender was dropped with the closure, so the handle
            // reports WorkerDisconnected
            error!(error = %e, "failed to start scan worker");
        }

        ScanHandle {
            receiver,
            started: Instant::now(),
        }
    }
}

/// Handle to a scan running in the background
pub struct ScanHandle {
    receiver: Receiver<ScanMessage>,
    started: Instant,
}

impl ScanHandle {
    /// Check for the result without blocking
    pub fn try_outcome(&self) -> Option<ScanMessage> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ScanError::WorkerDisconnected)),
        }
    }

    /// Poll every `poll_interval` until the scan reports
    pub fn wait(self, poll_interval: Duration) -> ScanMessage {
        loop {
            if let Some(result) = self.try_outcome() {
                debug!(elapsed_ms = self.elapsed().as_millis() as u64, "scan result received");
                return result;
            }
            thread::sleep(poll_interval);
        }
    }

    /// Time since the scan was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::grouping::FileRecord;
    use crate::core::scanner::{ScanConfig, WalkDirScanner};
    use crate::events::null_sender;
    use crossbeam_channel::Sender;
    use std::sync::Mutex;
    use std::time::SystemTime;

    /// Blocks until released, then reports one photo
    pub(crate) struct GatedScanner {
        gate: Mutex<Receiver<()>>,
    }

    impl GatedScanner {
        pub(crate) fn new() -> (Arc<Self>, Sender<()>) {
            let (tx, rx) = bounded(1);
            (Arc::new(Self { gate: Mutex::new(rx) }), tx)
        }
    }

    impl PhotoScanner for GatedScanner {
        fn scan(&self, paths: &[PathBuf]) -> Result<ScanOutput, ScanError> {
            self.scan_with_events(paths, &null_sender())
        }

        fn scan_with_events(
            &self,
            _paths: &[PathBuf],
            _events: &EventSender,
        ) -> Result<ScanOutput, ScanError> {
            self.gate.lock().unwrap().recv().unwrap();
            let mut output = ScanOutput::default();
            output.grouping.insert(FileRecord {
                path: PathBuf::from("/p/a.jpg"),
                camera: "Cam".to_string(),
                lens: "Lens".to_string(),
                modified: SystemTime::UNIX_EPOCH,
            });
            Ok(output)
        }
    }

    struct PanickingScanner;

    impl PhotoScanner for PanickingScanner {
        fn scan(&self, _paths: &[PathBuf]) -> Result<ScanOutput, ScanError> {
            panic!("scanner exploded")
        }

        fn scan_with_events(
            &self,
            paths: &[PathBuf],
            _events: &EventSender,
        ) -> Result<ScanOutput, ScanError> {
            self.scan(paths)
        }
    }

    #[test]
    fn result_arrives_only_after_scan_finishes() {
        let (scanner, release) = GatedScanner::new();
        let handle = ScanWorker::spawn(scanner, vec![], null_sender());

        assert!(handle.try_outcome().is_none());

        release.send(()).unwrap();
        let output = handle.wait(Duration::from_millis(5)).unwrap();
        assert_eq!(output.file_count(), 1);
    }

    #[test]
    fn scan_failure_is_reported_once() {
        let scanner = Arc::new(WalkDirScanner::new(ScanConfig::default()));
        let handle = ScanWorker::spawn(
            scanner,
            vec![PathBuf::from("/nonexistent/path/12345")],
            null_sender(),
        );

        let result = handle.wait(Duration::from_millis(5));
        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn dead_worker_reports_disconnect() {
        let handle = ScanWorker::spawn(Arc::new(PanickingScanner), vec![], null_sender());
        let result = handle.wait(Duration::from_millis(5));
        assert!(matches!(result, Err(ScanError::WorkerDisconnected)));
    }
}
