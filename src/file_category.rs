/// File categorization by extension.
///
/// This module maps a file extension to one of four broad categories
/// (images, videos, documents, other) using fixed lookup tables.
///
/// # Examples
///
/// ```
/// use datetidy::file_category::{Category, classify};
///
/// assert_eq!(classify(".JPG"), Category::Images);
/// assert_eq!(classify("mkv"), Category::Videos);
/// assert_eq!(classify(".pdf"), Category::Documents);
/// assert_eq!(classify(""), Category::Other);
/// ```
use serde::Serialize;
use std::path::Path;

/// Image extensions, lowercase, without the leading dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff"];

/// Video extensions, lowercase, without the leading dot.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv"];

/// Document extensions, lowercase, without the leading dot.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt"];

/// Represents a broad file category.
///
/// Categories decide the first directory level under the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Image files (JPG, PNG, GIF, etc.)
    Images,
    /// Video files (MP4, MKV, AVI, etc.)
    Videos,
    /// Document files (PDF, DOCX, TXT, etc.)
    Documents,
    /// Everything else, including files without an extension
    Other,
}

/// Which set of directory labels to use for categories.
///
/// Labels only change directory names; classification is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LabelSet {
    /// `Images`, `Videos`, `Documents`, `Other`
    #[default]
    English,
    /// `Fotos`, `Videos`, `Documentos`, `Otros`
    Spanish,
}

impl Category {
    /// All categories, in lookup order.
    pub const ALL: [Category; 4] = [
        Category::Images,
        Category::Videos,
        Category::Documents,
        Category::Other,
    ];

    /// Returns the directory name for this category under the given label set.
    ///
    /// # Examples
    ///
    /// ```
    /// use datetidy::file_category::{Category, LabelSet};
    ///
    /// assert_eq!(Category::Images.dir_name(LabelSet::English), "Images");
    /// assert_eq!(Category::Images.dir_name(LabelSet::Spanish), "Fotos");
    /// assert_eq!(Category::Other.dir_name(LabelSet::Spanish), "Otros");
    /// ```
    pub fn dir_name(&self, labels: LabelSet) -> &'static str {
        match (labels, self) {
            (LabelSet::English, Category::Images) => "Images",
            (LabelSet::English, Category::Videos) => "Videos",
            (LabelSet::English, Category::Documents) => "Documents",
            (LabelSet::English, Category::Other) => "Other",
            (LabelSet::Spanish, Category::Images) => "Fotos",
            (LabelSet::Spanish, Category::Videos) => "Videos",
            (LabelSet::Spanish, Category::Documents) => "Documentos",
            (LabelSet::Spanish, Category::Other) => "Otros",
        }
    }

    /// The fixed extension table for this category. `Other` has none.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Images => IMAGE_EXTENSIONS,
            Category::Videos => VIDEO_EXTENSIONS,
            Category::Documents => DOCUMENT_EXTENSIONS,
            Category::Other => &[],
        }
    }

    /// Classifies a path by its extension.
    ///
    /// A path without an extension (including dotfiles such as `.bashrc`)
    /// is `Other`.
    pub fn of_path(path: &Path) -> Category {
        match path.extension() {
            Some(ext) => classify(&ext.to_string_lossy()),
            None => Category::Other,
        }
    }
}

/// Maps an extension to its category.
///
/// The extension may carry its leading `.` and any letter case; both are
/// normalized before lookup. Tables are checked in the order images, videos,
/// documents, and the first match wins. Anything unmatched is `Other`.
pub fn classify(extension: &str) -> Category {
    let normalized = extension
        .strip_prefix('.')
        .unwrap_or(extension)
        .to_lowercase();

    if normalized.is_empty() {
        return Category::Other;
    }

    Category::ALL
        .into_iter()
        .find(|category| category.extensions().contains(&normalized.as_str()))
        .unwrap_or(Category::Other)
}
