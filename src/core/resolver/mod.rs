//! # Resolver Module
//!
//! Turns a tag map into the camera and lens labels photos are grouped by.
//!
//! ## Camera
//! `Model`, prefixed with `Make` unless the model already contains it.
//! Falls back to `Make: {make}`, then to [`NO_CAMERA_INFO`].
//!
//! ## Lens
//! `LensModel` as-is. Falls back to `Make: {lens make}`, then to
//! [`NO_LENS_INFO`].

use crate::core::metadata::{tags, TagMap};

/// Label for photos without camera make or model
pub const NO_CAMERA_INFO: &str = "No camera info";

/// Label for photos without lens make or model
pub const NO_LENS_INFO: &str = "No lens info";

/// Normalized, non-empty value of a tag
fn lookup(metadata: &TagMap, name: &str) -> Option<String> {
    metadata
        .get(name)
        .map(|value| value.to_display())
        .filter(|s| !s.is_empty())
}

/// Camera label for a photo
pub fn resolve_camera(metadata: &TagMap) -> String {
    let make = lookup(metadata, tags::MAKE);

    match (lookup(metadata, tags::MODEL), make) {
        (Some(model), Some(make)) => {
            // Avoid "Canon Canon EOS R5"
            if model.to_lowercase().contains(&make.to_lowercase()) {
                model
            } else {
                format!("{} {}", make, model)
            }
        }
        (Some(model), None) => model,
        (None, Some(make)) => format!("Make: {}", make),
        (None, None) => NO_CAMERA_INFO.to_string(),
    }
}

/// Lens label for a photo
pub fn resolve_lens(metadata: &TagMap) -> String {
    if let Some(model) = lookup(metadata, tags::LENS_MODEL) {
        return model;
    }

    match lookup(metadata, tags::LENS_MAKE) {
        Some(make) => format!("Make: {}", make),
        None => NO_LENS_INFO.to_string(),
    }
}
