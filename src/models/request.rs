// file: src/models/request.rs
// description: pipeline invocation request and result types
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PHASE_ONE_LABEL: &str = "### Phase 1: 信息提取 (Extraction)";
pub const PHASE_TWO_LABEL: &str = "### Phase 2: 逻辑推理与红队测试 (Reasoning)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    #[default]
    Simple,
    Deep,
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineMode::Simple => f.write_str("simple"),
            PipelineMode::Deep => f.write_str("deep"),
        }
    }
}

impl FromStr for PipelineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(PipelineMode::Simple),
            "deep" => Ok(PipelineMode::Deep),
            other => Err(format!("unknown mode '{}', expected simple or deep", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub instruction: String,
    pub context: Option<String>,
    pub mode: PipelineMode,
}

impl PipelineRequest {
    pub fn new(instruction: impl Into<String>, context: Option<String>, mode: PipelineMode) -> Self {
        Self {
            instruction: instruction.into(),
            context,
            mode,
        }
    }
}

/// Where the phase 2 text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasoningSource {
    Remote,
    Simulated,
    Degraded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    Simple(String),
    Deep {
        extraction: String,
        reasoning: String,
        reasoning_source: ReasoningSource,
    },
}

impl PipelineResult {
    /// Single text artifact appended to the transcript.
    pub fn render(&self) -> String {
        match self {
            PipelineResult::Simple(text) => text.clone(),
            PipelineResult::Deep {
                extraction,
                reasoning,
                ..
            } => format!(
                "{}\n\n{}\n\n---\n\n{}\n\n{}",
                PHASE_ONE_LABEL, extraction, PHASE_TWO_LABEL, reasoning
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_render_orders_sections() {
        let result = PipelineResult::Deep {
            extraction: "EXTRACT_OK".to_string(),
            reasoning: "CRITIQUE_OK".to_string(),
            reasoning_source: ReasoningSource::Simulated,
        };
        let text = result.render();

        let p1 = text.find(PHASE_ONE_LABEL).unwrap();
        let e = text.find("EXTRACT_OK").unwrap();
        let p2 = text.find(PHASE_TWO_LABEL).unwrap();
        let c = text.find("CRITIQUE_OK").unwrap();
        assert!(p1 < e && e < p2 && p2 < c);
    }

    #[test]
    fn test_simple_render_is_verbatim() {
        let result = PipelineResult::Simple("plain answer".to_string());
        assert_eq!(result.render(), "plain answer");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("DEEP".parse::<PipelineMode>(), Ok(PipelineMode::Deep));
        assert!("fast".parse::<PipelineMode>().is_err());
    }
}
