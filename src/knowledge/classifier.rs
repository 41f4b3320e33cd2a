// file: src/knowledge/classifier.rs
// description: document category classification from file names and front matter
// reference: path-based classification

use crate::knowledge::Frontmatter;
use crate::models::DocumentCategory;
use std::path::Path;
use tracing::warn;

pub struct DocumentClassifier;

impl DocumentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Category from the original media extension embedded in a display name,
    /// e.g. `CEO_Interview.mp4` or `BABA_Q3_Transcript.pdf`.
    pub fn classify_name(&self, name: &str) -> DocumentCategory {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("pdf") => DocumentCategory::Pdf,
            Some("mp4" | "mov" | "mkv" | "webm") => DocumentCategory::Video,
            Some("mp3" | "wav" | "m4a" | "flac") => DocumentCategory::Audio,
            _ => DocumentCategory::Text,
        }
    }

    /// Front matter `category` wins; unknown values fall back to the name.
    pub fn classify(&self, name: &str, frontmatter: Option<&Frontmatter>) -> DocumentCategory {
        if let Some(raw) = frontmatter.and_then(|fm| fm.get("category")) {
            match raw.parse::<DocumentCategory>() {
                Ok(category) => return category,
                Err(e) => warn!("{} in {}, classifying by name", e, name),
            }
        }

        self.classify_name(name)
    }
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
