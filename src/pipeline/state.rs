// file: src/pipeline/state.rs
// description: per-invocation pipeline state machine
// reference: idle -> assembling_context -> extracting -> (reasoning) -> done | failed

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    AssemblingContext,
    Extracting,
    Reasoning,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;

        match (self, next) {
            (Idle, AssemblingContext) | (Idle, Failed) => true,
            (AssemblingContext, Extracting) | (AssemblingContext, Failed) => true,
            (Extracting, Reasoning) | (Extracting, Done) | (Extracting, Failed) => true,
            (Reasoning, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::AssemblingContext => "assembling_context",
            PipelineState::Extracting => "extracting",
            PipelineState::Reasoning => "reasoning",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Ordered record of the states one invocation passed through.
#[derive(Debug, Clone)]
pub struct StateTrace {
    states: Vec<PipelineState>,
}

impl StateTrace {
    pub fn new() -> Self {
        Self {
            states: vec![PipelineState::Idle],
        }
    }

    pub fn current(&self) -> PipelineState {
        *self.states.last().unwrap_or(&PipelineState::Idle)
    }

    pub fn advance(&mut self, next: PipelineState) {
        let current = self.current();
        if !current.can_transition_to(next) {
            warn!("Unexpected pipeline transition {} -> {}", current, next);
        }
        debug!("Pipeline state {} -> {}", current, next);
        self.states.push(next);
    }

    pub fn contains(&self, state: PipelineState) -> bool {
        self.states.contains(&state)
    }

    pub fn states(&self) -> &[PipelineState] {
        &self.states
    }

    pub fn into_states(self) -> Vec<PipelineState> {
        self.states
    }
}

impl Default for StateTrace {
    fn default() -> Self {
        Self::new()
    }
}
