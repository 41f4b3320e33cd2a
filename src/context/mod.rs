// file: src/context/mod.rs
// description: retrieval context assembly module exports
// reference: internal module structure

mod assembler;

pub use assembler::{CONTEXT_SEPARATOR, ContextAssembler, TRUNCATION_MARKER};
