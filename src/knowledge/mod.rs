// file: src/knowledge/mod.rs
// description: knowledge base module exports
// reference: internal module structure

pub mod classifier;
pub mod collection;
pub mod frontmatter;
pub mod loader;
pub mod samples;
pub mod selection;

pub use classifier::DocumentClassifier;
pub use collection::DocumentCollection;
pub use frontmatter::{Frontmatter, FrontmatterParser};
pub use loader::DocumentLoader;
pub use samples::sample_documents;
pub use selection::DocumentSelection;
