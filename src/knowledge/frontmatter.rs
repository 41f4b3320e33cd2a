// file: src/knowledge/frontmatter.rs
// description: YAML frontmatter extraction from knowledge documents
// reference: https://docs.rs/yaml-rust

use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use yaml_rust::{Yaml, YamlLoader};

pub struct FrontmatterParser;

#[derive(Debug, Clone, Default)]
pub struct Frontmatter {
    pub fields: HashMap<String, String>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Splits `---` delimited YAML from the body. `file` is only used in errors.
    pub fn extract(&self, file: &str, content: &str) -> Result<Option<(Frontmatter, String)>> {
        if !content.starts_with("---") {
            return Ok(None);
        }

        let parts: Vec<&str> = content.splitn(3, "---").collect();

        if parts.len() < 3 {
            return Ok(None);
        }

        let yaml_content = parts[1].trim();
        let remaining_content = parts[2].trim();

        let docs =
            YamlLoader::load_from_str(yaml_content).map_err(|e| PipelineError::DocumentParse {
                file: file.to_string(),
                message: format!("YAML parse error: {}", e),
            })?;

        if docs.is_empty() {
            return Ok(None);
        }

        let mut fields = HashMap::new();

        if let Yaml::Hash(hash) = &docs[0] {
            for (key, value) in hash {
                let Yaml::String(k) = key else { continue };
                let rendered = match value {
                    Yaml::String(v) => v.clone(),
                    Yaml::Integer(i) => i.to_string(),
                    Yaml::Real(r) => r.clone(),
                    Yaml::Boolean(b) => b.to_string(),
                    _ => continue,
                };
                fields.insert(k.clone(), rendered);
            }
        }

        Ok(Some((
            Frontmatter { fields },
            remaining_content.to_string(),
        )))
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}
