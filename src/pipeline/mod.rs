// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod extraction;
pub mod messages;
mod narrator;
mod orchestrator;
pub mod personas;
mod progress;
mod state;

pub use extraction::ExtractionStage;
pub use narrator::{NarrationGuard, NarrationStage, ProgressNarrator};
pub use orchestrator::{PipelineOrchestrator, PipelineOutcome};
pub use progress::{NarrationDisplay, PipelineStats};
pub use state::{PipelineState, StateTrace};
