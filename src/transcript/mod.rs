// file: src/transcript/mod.rs
// description: conversation transcript, session boundary and persistence exports
// reference: internal module structure

mod conversation;
mod session;
mod store;

pub use conversation::Transcript;
pub use session::AnalysisSession;
pub use store::TranscriptStore;
