//! # Metadata Module
//!
//! Reads EXIF tags from photo files into a name → value map.
//!
//! ## Extracted Tags
//! - `Make`, `Model` (camera body)
//! - `LensMake`, `LensModel` (lens)
//! - `DateTimeOriginal`, `FocalLength`, `FNumber`, `ExposureTime`, `ISO`
//!
//! Extraction never fails: an unreadable file or a file without EXIF
//! yields an empty map.

use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Tag names the resolver looks up
pub mod tags {
    pub const MAKE: &str = "Make";
    pub const MODEL: &str = "Model";
    pub const LENS_MAKE: &str = "LensMake";
    pub const LENS_MODEL: &str = "LensModel";
}

/// A single tag value as stored in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagValue {
    Text(String),
    /// Raw bytes, possibly not valid UTF-8
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
}

impl TagValue {
    /// Human-readable form of the value.
    ///
    /// Bytes decode as UTF-8 with replacement characters for invalid
    /// sequences. NUL padding and surrounding whitespace are trimmed.
    pub fn to_display(&self) -> String {
        match self {
            TagValue::Text(s) => clean(s),
            TagValue::Bytes(b) => clean(&String::from_utf8_lossy(b)),
            TagValue::Integer(n) => n.to_string(),
            TagValue::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
            TagValue::Float(f) => f.to_string(),
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Text(s.to_string())
    }
}

fn clean(s: &str) -> String {
    s.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

/// Tag name → value
pub type TagMap = BTreeMap<String, TagValue>;

/// Capability to read metadata tags for a file.
///
/// Implement this trait to plug in another metadata library or a test
/// double. Implementations must not fail; return an empty map instead.
pub trait MetadataReader: Send + Sync {
    fn read(&self, path: &Path) -> TagMap;
}

/// Reads EXIF with kamadak-exif
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataReader;

impl MetadataReader for ExifMetadataReader {
    fn read(&self, path: &Path) -> TagMap {
        extract_tags(path)
    }
}

const EXTRACTED: &[(Tag, &str)] = &[
    (Tag::Make, tags::MAKE),
    (Tag::Model, tags::MODEL),
    (Tag::LensMake, tags::LENS_MAKE),
    (Tag::LensModel, tags::LENS_MODEL),
    (Tag::DateTimeOriginal, "DateTimeOriginal"),
    (Tag::FocalLength, "FocalLength"),
    (Tag::FNumber, "FNumber"),
    (Tag::ExposureTime, "ExposureTime"),
    (Tag::PhotographicSensitivity, "ISO"),
];

/// Extract EXIF tags from a photo file
pub fn extract_tags(path: &Path) -> TagMap {
    let mut map = TagMap::new();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot open file for EXIF");
            return map;
        }
    };

    let mut bufreader = BufReader::new(&file);
    let exif = match Reader::new().read_from_container(&mut bufreader) {
        Ok(r) => r,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable EXIF");
            return map;
        }
    };

    for (tag, name) in EXTRACTED {
        if let Some(field) = exif.get_field(*tag, In::PRIMARY) {
            if let Some(value) = convert_value(&field.value) {
                map.insert((*name).to_string(), value);
            }
        }
    }

    map
}

/// Map an EXIF value to a [`TagValue`], keeping only the first component
fn convert_value(value: &Value) -> Option<TagValue> {
    match value {
        Value::Ascii(vec) => vec.first().map(|bytes| match String::from_utf8(bytes.clone()) {
            Ok(s) => TagValue::Text(s),
            Err(e) => TagValue::Bytes(e.into_bytes()),
        }),
        Value::Byte(bytes) | Value::Undefined(bytes, _) => Some(TagValue::Bytes(bytes.clone())),
        Value::Short(vec) => vec.first().map(|v| TagValue::Integer(i64::from(*v))),
        Value::Long(vec) => vec.first().map(|v| TagValue::Integer(i64::from(*v))),
        Value::SShort(vec) => vec.first().map(|v| TagValue::Integer(i64::from(*v))),
        Value::SLong(vec) => vec.first().map(|v| TagValue::Integer(i64::from(*v))),
        Value::Rational(vec) => vec.first().map(|r| TagValue::Float(r.to_f64())),
        Value::SRational(vec) => vec.first().map(|r| TagValue::Float(r.to_f64())),
        Value::Float(vec) => vec.first().map(|v| TagValue::Float(f64::from(*v))),
        Value::Double(vec) => vec.first().map(|v| TagValue::Float(*v)),
        _ => None,
    }
}
