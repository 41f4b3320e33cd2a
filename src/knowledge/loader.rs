// file: src/knowledge/loader.rs
// description: Directory walking and knowledge document loading with filtering
// reference: https://docs.rs/walkdir

use crate::config::KnowledgeConfig;
use crate::error::{PipelineError, Result};
use crate::knowledge::{
    DocumentClassifier, DocumentCollection, Frontmatter, FrontmatterParser, sample_documents,
};
use crate::models::KnowledgeDocument;
use crate::utils::Validator;
use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const SUMMARY_MAX_CHARS: usize = 80;

pub struct DocumentLoader {
    config: KnowledgeConfig,
    parser: FrontmatterParser,
    classifier: DocumentClassifier,
}

impl DocumentLoader {
    pub fn new(config: KnowledgeConfig) -> Self {
        Self {
            config,
            parser: FrontmatterParser::new(),
            classifier: DocumentClassifier::new(),
        }
    }

    /// Builds the session collection: built-in samples (if enabled), then the
    /// documents directory ingested on top so its files list first.
    pub fn load_knowledge_base(&self) -> Result<DocumentCollection> {
        let mut collection = if self.config.include_samples {
            DocumentCollection::from_documents(sample_documents())?
        } else {
            DocumentCollection::new()
        };

        if let Some(dir) = &self.config.documents_dir {
            for document in self.load_directory(dir)? {
                if let Err(e) = collection.ingest(document) {
                    warn!("Skipping document: {}", e);
                }
            }
        }

        Ok(collection)
    }

    /// Loads every `.md` / `.txt` file under `root`, ordered by path.
    pub fn load_directory(&self, root: &Path) -> Result<Vec<KnowledgeDocument>> {
        Validator::validate_directory(root)?;

        info!("Scanning knowledge directory: {}", root.display());
        let mut documents = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if self.should_skip(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            let is_text = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("md") | Some("txt")
            );
            if !is_text {
                continue;
            }

            let Ok(metadata) = entry.metadata() else {
                continue;
            };

            let size = metadata.len();
            let max_size = (self.config.max_file_size_mb as u64).saturating_mul(1024 * 1024);
            if size > max_size {
                debug!(
                    "Skipping large file ({} MB): {}",
                    size / 1024 / 1024,
                    path.display()
                );
                continue;
            }

            let modified = metadata
                .modified()
                .ok()
                .map(|t| DateTime::<Utc>::from(t).date_naive())
                .unwrap_or_else(|| Utc::now().date_naive());

            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(source) => {
                    let err = PipelineError::FileOperation {
                        path: path.to_path_buf(),
                        source,
                    };
                    warn!("Skipping unreadable document: {}", err);
                    continue;
                }
            };

            match self.build_document(&relative_path, &content, modified) {
                Ok(Some(document)) => documents.push(document),
                Ok(None) => warn!("Skipping empty document: {}", relative_path),
                Err(e) => warn!("Skipping document {}: {}", relative_path, e),
            }
        }

        info!("Loaded {} knowledge documents", documents.len());
        Ok(documents)
    }

    /// Turns raw file content into a document. Returns `None` for an empty body.
    pub fn build_document(
        &self,
        relative_path: &str,
        content: &str,
        modified: NaiveDate,
    ) -> Result<Option<KnowledgeDocument>> {
        let (frontmatter, body) = match self.parser.extract(relative_path, content)? {
            Some((fm, body)) => (Some(fm), body),
            None => (None, content.trim().to_string()),
        };

        if body.trim().is_empty() {
            return Ok(None);
        }

        let field = |key: &str| frontmatter.as_ref().and_then(|fm: &Frontmatter| fm.get(key));

        let id = field("id")
            .map(str::to_string)
            .unwrap_or_else(|| KnowledgeDocument::derive_id(relative_path));

        let name = field("name")
            .or_else(|| field("title"))
            .map(str::to_string)
            .unwrap_or_else(|| {
                Path::new(relative_path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| relative_path.to_string())
            });

        let category = self.classifier.classify(&name, frontmatter.as_ref());

        let ingested_on = match field("date") {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|e| {
                warn!("Invalid date '{}' in {}: {}", raw, relative_path, e);
                modified
            }),
            None => modified,
        };

        let summary = field("summary")
            .map(str::to_string)
            .unwrap_or_else(|| first_line_summary(&body));

        Ok(Some(KnowledgeDocument::new(
            id,
            name,
            category,
            ingested_on,
            summary,
            body,
        )))
    }

    fn should_skip(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.config.skip_patterns {
            if pattern.contains('*') {
                let pattern_without_star = pattern.replace("*.", ".");
                if path_str.ends_with(&pattern_without_star) {
                    return true;
                }
            } else if path_str.contains(pattern.as_str()) {
                return true;
            }
        }

        false
    }
}

fn first_line_summary(body: &str) -> String {
    let line = body
        .lines()
        .map(|l| l.trim().trim_start_matches('#').trim())
        .find(|l| !l.is_empty())
        .unwrap_or_default();

    if line.chars().count() > SUMMARY_MAX_CHARS {
        let truncated: String = line.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        line.to_string()
    }
}
