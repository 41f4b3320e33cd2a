// file: src/models/document.rs
// description: knowledge document model used as retrieval material
// reference: internal data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Pdf,
    Video,
    Audio,
    Text,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Pdf => "pdf",
            DocumentCategory::Video => "video",
            DocumentCategory::Audio => "audio",
            DocumentCategory::Text => "text",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" | "report" => Ok(DocumentCategory::Pdf),
            "video" => Ok(DocumentCategory::Video),
            "audio" => Ok(DocumentCategory::Audio),
            "text" | "note" | "markdown" => Ok(DocumentCategory::Text),
            other => Err(format!("unknown document category: {}", other)),
        }
    }
}

/// A piece of retrieval material. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    id: String,
    name: String,
    category: DocumentCategory,
    ingested_on: NaiveDate,
    summary: String,
    content: String,
}

impl KnowledgeDocument {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: DocumentCategory,
        ingested_on: NaiveDate,
        summary: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            ingested_on,
            summary: summary.into(),
            content: content.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> DocumentCategory {
        self.category
    }

    pub fn ingested_on(&self) -> NaiveDate {
        self.ingested_on
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Stable short identifier derived from an arbitrary key such as a relative path.
    pub fn derive_id(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..12].to_string()
    }
}
