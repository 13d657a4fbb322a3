//! Photo relocation module.
//!
//! Copies or moves selected photos into `target/<camera>/<lens>/` folders.
//! Existing files are never overwritten; a clashing name gets a `(1)`,
//! `(2)`, ... suffix before its extension.

mod executor;
mod planner;
mod types;

pub use executor::{unique_destination, RelocateExecutor};
pub use planner::{sanitize, RelocatePlanner};
pub use types::*;

use crate::core::grouping::Grouping;
use crate::events::EventSender;
use std::path::Path;

/// Plan and execute a relocation in one call
pub fn relocate(
    grouping: &Grouping,
    selection: &Selection,
    target_root: &Path,
    action: Action,
    organize_by_lens: bool,
    events: &EventSender,
) -> RelocateResult {
    let plan = RelocatePlanner::plan(grouping, selection, target_root, organize_by_lens);
    RelocateExecutor::execute(&plan, action, events)
}
