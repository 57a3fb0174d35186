//! Relationship query service
//!
//! Loads the catalog, builds the concept tree of a title and lays it out.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::catalog::CsvCatalog;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{layout, ConceptGraph, ConceptTree, PositionMap, Record, RelationshipExtractor};
use crate::infrastructure::traits::FileSystem;

/// Result of one query: the tree, its layout and its node/edge view.
#[derive(Debug)]
pub struct QueryOutput {
    pub tree: ConceptTree,
    pub positions: PositionMap,
    pub graph: ConceptGraph,
    /// Whether the root title exists in the catalog
    pub root_found: bool,
}

/// Service answering "what is related to this title".
pub struct QueryService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl QueryService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Load the configured catalog.
    #[instrument(level = "debug", skip(self))]
    pub fn load_catalog(&self) -> ApplicationResult<Vec<Record>> {
        let path = &self.settings.catalog;
        let records = CsvCatalog::load(self.fs.as_ref(), path, &self.settings.columns)?;
        info!("loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Build and lay out the concept tree of `root_title` over `table`.
    ///
    /// An unknown title is not an error: the output holds the empty tree.
    #[instrument(level = "debug", skip(self, table), fields(rows = table.len()))]
    pub fn query(&self, table: &[Record], root_title: &str) -> QueryOutput {
        let extractor = RelationshipExtractor::new(table);
        let root_found = extractor.find_root(root_title).is_some();
        let tree = extractor.build(root_title);
        let positions = layout(&tree, &self.settings.layout, None);
        let graph = ConceptGraph::from_tree(&tree);
        debug!(
            "query {:?}: {} nodes, {} edges",
            root_title,
            graph.node_count(),
            graph.edge_count()
        );

        QueryOutput {
            tree,
            positions,
            graph,
            root_found,
        }
    }

    /// Load the catalog and query it in one step.
    pub fn run(&self, root_title: &str) -> ApplicationResult<QueryOutput> {
        let table = self.load_catalog()?;
        Ok(self.query(&table, root_title))
    }
}
