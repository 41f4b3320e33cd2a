// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod message;
pub mod request;

pub use document::{DocumentCategory, KnowledgeDocument};
pub use message::{ChatMessage, Role};
pub use request::{
    PHASE_ONE_LABEL, PHASE_TWO_LABEL, PipelineMode, PipelineRequest, PipelineResult,
    ReasoningSource,
};
