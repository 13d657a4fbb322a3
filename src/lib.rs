//! # GearView
//!
//! Groups JPEG photos by the camera body and lens recorded in their EXIF
//! data, then copies or moves them into `target/<camera>/<lens>/` folders.
//!
//! ## Core Rules
//! - **First name wins** - only the first file with a given file name is
//!   grouped, across all source folders
//! - **Never overwrite** - clashing names get a `(1)`, `(2)`, ... suffix
//! - **Failures stay local** - one bad file never aborts a scan or a batch
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation layers:
//! - `core` - Metadata, grouping, scanning and relocation
//! - `session` - Per-session state and the background scan lifecycle
//! - `events` - Event-driven progress reporting (GUI-ready)
//! - `error` - User-friendly error types

pub mod core;
pub mod error;
pub mod events;
pub mod session;

// Re-export commonly used types at the crate root
pub use error::{GearViewError, Result};
pub use session::{Session, SessionBuilder};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    // A GUI host may already have installed its own subscriber
    let _ = tracing::subscriber::set_global_default(subscriber);
}
