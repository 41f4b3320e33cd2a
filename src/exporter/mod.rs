// file: src/exporter/mod.rs
// description: transcript export module exports
// reference: internal module structure

pub mod json;

pub use json::{ExportManifest, ExportedTranscript, JsonExporter};
