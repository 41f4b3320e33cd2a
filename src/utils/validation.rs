// file: src/utils/validation.rs
// description: input validation for instructions, document ids and paths
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::Path;

pub const MAX_INSTRUCTION_CHARS: usize = 20_000;

pub struct Validator;

impl Validator {
    /// Trims the instruction and rejects blank or oversized input.
    pub fn validate_instruction(instruction: &str) -> Result<String> {
        let trimmed = instruction.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::Validation(
                "Instruction is empty".to_string(),
            ));
        }

        let length = trimmed.chars().count();
        if length > MAX_INSTRUCTION_CHARS {
            return Err(PipelineError::Validation(format!(
                "Instruction too long ({} chars, max {})",
                length, MAX_INSTRUCTION_CHARS
            )));
        }

        Ok(trimmed.to_string())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Splits `a,b , c` into ids, dropping blanks.
    pub fn parse_id_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Char-boundary safe truncation with a trailing ellipsis.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let head: String = text.chars().take(max_chars).collect();
            format!("{}...", head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_instruction() {
        assert_eq!(
            Validator::validate_instruction("  分析阿里云增长  ").unwrap(),
            "分析阿里云增长"
        );
        assert!(Validator::validate_instruction("").is_err());
        assert!(Validator::validate_instruction(" \n\t ").is_err());
        assert!(Validator::validate_instruction(&"x".repeat(MAX_INSTRUCTION_CHARS + 1)).is_err());
    }

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());

        let file = temp.path().join("note.md");
        std::fs::write(&file, "x").unwrap();
        assert!(Validator::validate_directory(&file).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://api.deepseek.com").is_ok());
        assert!(Validator::validate_url("api.deepseek.com").is_err());
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(
            Validator::parse_id_list("baba-fy2024-q3, ,macro-strategy-2024,"),
            vec!["baba-fy2024-q3", "macro-strategy-2024"]
        );
        assert!(Validator::parse_id_list("  ").is_empty());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(Validator::truncate_text("阿里巴巴集团财报", 4), "阿里巴巴...");
    }
}
