// file: src/context/assembler.rs
// description: joins selected knowledge documents into one retrieval context string
// reference: priority-ordered truncation when a character budget is configured

use crate::knowledge::{DocumentCollection, DocumentSelection};
use tracing::{debug, warn};

pub const CONTEXT_SEPARATOR: &str = "\n\n=====[ 文档分隔 ]=====\n\n";
pub const TRUNCATION_MARKER: &str = "…[已截断]";

#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    budget_chars: Option<usize>,
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the assembled context at `budget_chars` characters, separators included.
    pub fn with_budget(budget_chars: Option<usize>) -> Self {
        Self { budget_chars }
    }

    /// `None` when nothing is selected; otherwise selected contents in collection order.
    pub fn assemble(
        &self,
        collection: &DocumentCollection,
        selection: &DocumentSelection,
    ) -> Option<String> {
        if selection.is_empty() {
            return None;
        }

        for id in selection.iter() {
            if collection.get(id).is_none() {
                debug!("Selected document {} is not in the collection", id);
            }
        }

        let contents: Vec<&str> = collection
            .selected(selection)
            .map(|doc| doc.content())
            .collect();

        if contents.is_empty() {
            return None;
        }

        let context = match self.budget_chars {
            Some(budget) => Self::join_within_budget(&contents, budget),
            None => contents.join(CONTEXT_SEPARATOR),
        };

        debug!(
            "Assembled context from {} documents ({} chars)",
            contents.len(),
            context.chars().count()
        );
        Some(context)
    }

    fn join_within_budget(contents: &[&str], budget: usize) -> String {
        let separator_len = CONTEXT_SEPARATOR.chars().count();
        let marker_len = TRUNCATION_MARKER.chars().count();
        let mut out = String::new();
        let mut used = 0usize;

        for (index, content) in contents.iter().enumerate() {
            let prefix = if index == 0 { 0 } else { separator_len };
            let len = content.chars().count();

            if used + prefix + len <= budget {
                if index > 0 {
                    out.push_str(CONTEXT_SEPARATOR);
                }
                out.push_str(content);
                used += prefix + len;
                continue;
            }

            let room = budget.saturating_sub(used + prefix + marker_len);
            if room > 0 {
                if index > 0 {
                    out.push_str(CONTEXT_SEPARATOR);
                }
                out.extend(content.chars().take(room));
                out.push_str(TRUNCATION_MARKER);
            }

            warn!(
                "Context budget of {} chars reached; truncated document {} and dropped {} more",
                budget,
                index + 1,
                contents.len() - index - 1
            );
            break;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentCategory, KnowledgeDocument};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn doc(id: &str, content: &str) -> KnowledgeDocument {
        KnowledgeDocument::new(
            id,
            id,
            DocumentCategory::Text,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "",
            content,
        )
    }

    fn collection(docs: Vec<KnowledgeDocument>) -> DocumentCollection {
        DocumentCollection::from_documents(docs).unwrap()
    }

    #[test]
    fn test_empty_selection_is_none() {
        let coll = collection(vec![doc("a", "alpha")]);
        assert_eq!(
            ContextAssembler::new().assemble(&coll, &DocumentSelection::new()),
            None
        );
    }

    #[test]
    fn test_joins_in_collection_order() {
        let coll = collection(vec![doc("a", "alpha"), doc("b", "beta"), doc("c", "gamma")]);
        let selection = DocumentSelection::from_ids(["c", "a"]);

        let context = ContextAssembler::new().assemble(&coll, &selection).unwrap();
        assert_eq!(context, format!("alpha{}gamma", CONTEXT_SEPARATOR));
    }

    #[test]
    fn test_reordering_collection_reorders_output() {
        let selection = DocumentSelection::from_ids(["a", "b"]);
        let forward = collection(vec![doc("a", "alpha"), doc("b", "beta")]);
        let reversed = collection(vec![doc("b", "beta"), doc("a", "alpha")]);

        let assembler = ContextAssembler::new();
        assert_eq!(
            assembler.assemble(&forward, &selection).unwrap(),
            format!("alpha{}beta", CONTEXT_SEPARATOR)
        );
        assert_eq!(
            assembler.assemble(&reversed, &selection).unwrap(),
            format!("beta{}alpha", CONTEXT_SEPARATOR)
        );
    }

    #[test]
    fn test_identical_content_not_deduplicated() {
        let coll = collection(vec![doc("a", "same"), doc("b", "same")]);
        let selection = DocumentSelection::from_ids(["a", "b"]);
        let context = ContextAssembler::new().assemble(&coll, &selection).unwrap();
        assert_eq!(context.matches("same").count(), 2);
    }

    #[test]
    fn test_unknown_ids_only_is_none() {
        let coll = collection(vec![doc("a", "alpha")]);
        let selection = DocumentSelection::from_ids(["zzz"]);
        assert_eq!(ContextAssembler::new().assemble(&coll, &selection), None);
    }

    #[test]
    fn test_budget_truncates_later_documents() {
        let coll = collection(vec![doc("a", "alpha"), doc("b", &"b".repeat(500))]);
        let selection = DocumentSelection::from_ids(["a", "b"]);
        let budget = 5 + CONTEXT_SEPARATOR.chars().count() + 20;

        let context = ContextAssembler::with_budget(Some(budget))
            .assemble(&coll, &selection)
            .unwrap();

        assert!(context.starts_with("alpha"));
        assert!(context.ends_with(TRUNCATION_MARKER));
        assert_eq!(context.chars().count(), budget);
    }

    #[test]
    fn test_budget_large_enough_is_untouched() {
        let coll = collection(vec![doc("a", "alpha"), doc("b", "beta")]);
        let selection = DocumentSelection::from_ids(["a", "b"]);
        let context = ContextAssembler::with_budget(Some(10_000))
            .assemble(&coll, &selection)
            .unwrap();
        assert_eq!(context, format!("alpha{}beta", CONTEXT_SEPARATOR));
    }
}
