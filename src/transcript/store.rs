// file: src/transcript/store.rs
// description: JSON file persistence for the conversation transcript
// reference: https://docs.rs/tokio/latest/tokio/fs

use crate::error::{PipelineError, Result};
use crate::transcript::Transcript;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

pub struct TranscriptStore {
    storage_path: PathBuf,
}

impl TranscriptStore {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Loads the saved transcript, or a fresh greeting-only one if none exists.
    pub async fn load(&self) -> Result<Transcript> {
        if !self.storage_path.exists() {
            debug!("No transcript found at {:?}, starting fresh", self.storage_path);
            return Ok(Transcript::new());
        }

        let contents = fs::read_to_string(&self.storage_path)
            .await
            .map_err(|source| PipelineError::FileOperation {
                path: self.storage_path.clone(),
                source,
            })?;

        let transcript: Transcript = serde_json::from_str(&contents).map_err(|e| {
            PipelineError::Serialization(format!(
                "Failed to parse transcript {}: {}",
                self.storage_path.display(),
                e
            ))
        })?;

        info!("Loaded transcript with {} messages", transcript.len());
        Ok(transcript)
    }

    pub async fn save(&self, transcript: &Transcript) -> Result<()> {
        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| PipelineError::FileOperation {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let contents = serde_json::to_string_pretty(transcript)?;
        fs::write(&self.storage_path, contents)
            .await
            .map_err(|source| PipelineError::FileOperation {
                path: self.storage_path.clone(),
                source,
            })?;

        debug!("Saved transcript with {} messages", transcript.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_gives_fresh_transcript() {
        let dir = tempdir().unwrap();
        let store = TranscriptStore::new(dir.path().join("none.json"));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transcript_persistence() {
        let dir = tempdir().unwrap();
        let store = TranscriptStore::new(dir.path().join("nested/transcript.json"));

        let mut transcript = Transcript::new();
        transcript.push_user("分析 BABA");
        transcript.push_assistant("### Phase 1");
        store.save(&transcript).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, transcript);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transcript.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = TranscriptStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }
}
