// file: src/exporter/json.rs
// description: json export of the conversation transcript with a manifest

use crate::error::{PipelineError, Result};
use crate::models::ChatMessage;
use crate::transcript::Transcript;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedTranscript<'a> {
    pub exported_at: String,
    pub message_count: usize,
    pub messages: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_messages: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| PipelineError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `transcript-<timestamp>.json` and a `manifest.json` listing it.
    pub async fn export_transcript(
        &self,
        transcript: &Transcript,
        pretty: bool,
    ) -> Result<ExportManifest> {
        info!("Starting JSON export to {:?}", self.output_dir);

        let now = Utc::now();
        let exported_at = now.to_rfc3339();
        let file_name = format!("transcript-{}.json", now.format("%Y%m%dT%H%M%S%3fZ"));

        let payload = ExportedTranscript {
            exported_at: exported_at.clone(),
            message_count: transcript.len(),
            messages: transcript.messages(),
        };
        self.write_json(&file_name, &payload, pretty).await?;

        let manifest = ExportManifest {
            exported_at,
            total_messages: transcript.len(),
            files: vec![file_name],
        };
        self.write_json(MANIFEST_FILE, &manifest, true).await?;

        info!(
            "Export complete: {} messages exported",
            manifest.total_messages
        );
        Ok(manifest)
    }

    async fn write_json<T: Serialize>(&self, file_name: &str, value: &T, pretty: bool) -> Result<()> {
        let contents = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| PipelineError::FileOperation { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_exporter_creation() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path().join("out"));
        assert!(exporter.is_ok());
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn test_export_writes_transcript_and_manifest() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path()).unwrap();

        let mut transcript = Transcript::new();
        transcript.push_user("memo please");

        let manifest = tokio_test::block_on(exporter.export_transcript(&transcript, false)).unwrap();
        assert_eq!(manifest.total_messages, 2);
        assert_eq!(manifest.files.len(), 1);
        assert!(manifest.files[0].starts_with("transcript-"));

        let exported = std::fs::read_to_string(dir.path().join(&manifest.files[0])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
        assert_eq!(value["message_count"], 2);
        assert_eq!(value["messages"][1]["role"], "user");

        let manifest_json = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(manifest_json.contains("total_messages"));
    }
}
