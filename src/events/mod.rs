//! # Events Module
//!
//! Event-driven progress reporting for any presentation layer.
//!
//! ## Design
//! The core library emits events through channels, allowing a CLI or a GUI
//! to subscribe and display progress. Scans additionally report exactly one
//! [`ScanOutcome`] when they finish.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! let mut session = Session::builder().events(sender).build();
//! session.add_source_folder("/Users/photos")?;
//! session.start_scan()?;
//!
//! while session.poll_scan().is_none() {
//!     for event in receiver.drain() {
//!         if let Event::Scan(ScanEvent::Progress(p)) = event {
//!             println!("Grouped {} photos", p.photos_found);
//!         }
//!     }
//!     std::thread::sleep(Duration::from_millis(100));
//! }
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
