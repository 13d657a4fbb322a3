//! File filtering logic for the scanner.

use std::collections::HashSet;
use std::path::Path;

/// Extensions scanned by default
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Decides which files the scanner picks up
#[derive(Debug, Clone)]
pub struct ImageFilter {
    /// Lowercase file extensions to include
    extensions: HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ImageFilter {
    /// JPEG files, hidden ones included
    pub fn new() -> Self {
        Self {
            extensions: JPEG_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: true,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }

        // Suffix match so a bare ".jpg" counts; Path::extension sees no
        // extension there
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.extensions.iter().any(|ext| {
            name.strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Name starts with a dot
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_jpeg_any_case() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
        assert!(filter.should_include(Path::new("/photos/image.JPEG")));
        assert!(filter.should_include(Path::new("/photos/image.JpG")));
    }

    #[test]
    fn filter_excludes_other_images() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/IMG_1234.HEIC")));
        assert!(!filter.should_include(Path::new("/photos/shot.png")));
        assert!(!filter.should_include(Path::new("/photos/document.pdf")));
    }

    #[test]
    fn filter_includes_hidden_by_default() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn bare_extension_names_are_photos() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/.jpg")));
        assert!(filter.should_include(Path::new("/photos/.JPEG")));
        assert!(!filter.should_include(Path::new("/photos/jpg")));
        assert!(!filter.should_include(Path::new("/photos/notjpg")));
        assert!(!filter.should_include(Path::new("/photos/.jpg.bak")));
    }

    #[test]
    fn filter_can_exclude_hidden() {
        let filter = ImageFilter::new().with_hidden(false);
        assert!(!filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn filter_handles_no_extension() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/jpg")));
    }

    #[test]
    fn custom_extensions_are_lowercased() {
        let filter = ImageFilter::new().with_extensions(vec!["JPE".to_string()]);
        assert!(filter.should_include(Path::new("a.jpe")));
        assert!(!filter.should_include(Path::new("a.jpg")));
    }
}
