//! Relationship extraction: which titles share an attribute with the root.

use tracing::{debug, instrument};

use crate::domain::entities::{Category, ConceptTree, Record};

/// Maximum number of related titles kept per category.
pub const MAX_RELATED: usize = 3;

/// Builds concept trees over a read-only record table.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipExtractor<'a> {
    table: &'a [Record],
}

impl<'a> RelationshipExtractor<'a> {
    pub fn new(table: &'a [Record]) -> Self {
        Self { table }
    }

    /// First record titled exactly `root_title`.
    pub fn find_root(&self, root_title: &str) -> Option<&'a Record> {
        self.table.iter().find(|r| r.title == root_title)
    }

    /// Builds the tree for `root_title`.
    ///
    /// A title missing from the table yields a tree whose categories are all empty.
    #[instrument(level = "debug", skip(self), fields(rows = self.table.len()))]
    pub fn build(&self, root_title: &str) -> ConceptTree {
        let mut tree = ConceptTree::empty(root_title);

        let Some(root) = self.find_root(root_title) else {
            debug!("root not found: {:?}", root_title);
            return tree;
        };

        for category in Category::ALL {
            let root_value = category.attribute(root);
            let related = self.related_titles(category, root_value, root_title);
            debug!("{}: {:?} -> {} related", category, root_value, related.len());
            tree.set_related(category, related);
        }
        tree
    }

    fn related_titles(&self, category: Category, root_value: &str, root_title: &str) -> Vec<String> {
        if root_value.is_empty() {
            return Vec::new();
        }
        self.table
            .iter()
            .filter(|r| r.title != root_title && category.matches(root_value, r))
            .take(MAX_RELATED)
            .map(|r| r.title.clone())
            .collect()
    }
}

/// Builds the concept tree of `root_title` over `table`.
pub fn build_concept_tree(table: &[Record], root_title: &str) -> ConceptTree {
    RelationshipExtractor::new(table).build(root_title)
}
