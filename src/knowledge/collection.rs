// file: src/knowledge/collection.rs
// description: ordered, read-mostly collection of knowledge documents
// reference: internal data structures

use crate::error::{PipelineError, Result};
use crate::knowledge::DocumentSelection;
use crate::models::KnowledgeDocument;
use tracing::info;

/// Documents in display order. `ingest` is the only write path and prepends.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    documents: Vec<KnowledgeDocument>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<KnowledgeDocument>) -> Result<Self> {
        let mut collection = Self::new();
        // ingest prepends, so walk backwards to keep the given order
        for document in documents.into_iter().rev() {
            collection.ingest(document)?;
        }
        Ok(collection)
    }

    pub fn ingest(&mut self, document: KnowledgeDocument) -> Result<()> {
        if self.get(document.id()).is_some() {
            return Err(PipelineError::Validation(format!(
                "Document id already ingested: {}",
                document.id()
            )));
        }

        info!("Ingested document {} ({})", document.name(), document.id());
        self.documents.insert(0, document);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeDocument> {
        self.documents.iter().find(|doc| doc.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeDocument> {
        self.documents.iter()
    }

    /// Selected documents, in collection order.
    pub fn selected<'a>(
        &'a self,
        selection: &'a DocumentSelection,
    ) -> impl Iterator<Item = &'a KnowledgeDocument> + 'a {
        self.documents
            .iter()
            .filter(move |doc| selection.contains(doc.id()))
    }

    pub fn ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentCategory;
    use chrono::NaiveDate;

    fn doc(id: &str) -> KnowledgeDocument {
        KnowledgeDocument::new(
            id,
            format!("{}.pdf", id),
            DocumentCategory::Pdf,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "summary",
            format!("content of {}", id),
        )
    }

    #[test]
    fn test_ingest_prepends() {
        let mut collection = DocumentCollection::new();
        collection.ingest(doc("a")).unwrap();
        collection.ingest(doc("b")).unwrap();
        assert_eq!(collection.ids(), vec!["b", "a"]);
    }

    #[test]
    fn test_from_documents_keeps_order() {
        let collection = DocumentCollection::from_documents(vec![doc("a"), doc("b")]).unwrap();
        assert_eq!(collection.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut collection = DocumentCollection::new();
        collection.ingest(doc("a")).unwrap();
        assert!(matches!(
            collection.ingest(doc("a")),
            Err(PipelineError::Validation(_))
        ));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_selected_follows_collection_order() {
        let collection =
            DocumentCollection::from_documents(vec![doc("a"), doc("b"), doc("c")]).unwrap();
        let selection = DocumentSelection::from_ids(["c", "a"]);
        let ids: Vec<&str> = collection.selected(&selection).map(|d| d.id()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
