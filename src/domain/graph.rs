//! Arena-backed node/edge view of a concept tree, as consumed by renderers.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Category, ConceptTree};

/// Role of a node in the concept graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Category(Category),
    Leaf,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Category(_) => "category",
            NodeKind::Leaf => "leaf",
        }
    }
}

/// Graph node. A title related through several categories is a single node.
#[derive(Debug)]
pub struct ConceptNode {
    /// Node identifier (title or category label)
    pub id: String,
    pub kind: NodeKind,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

/// Directed edge between two node identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Category name on root→category edges, none on category→leaf edges
    pub label: Option<String>,
}

/// Concept tree materialized as nodes and edges.
#[derive(Debug, Default)]
pub struct ConceptGraph {
    arena: Arena<ConceptNode>,
    by_id: HashMap<String, Index>,
    order: Vec<Index>,
    edges: Vec<Edge>,
    root: Option<Index>,
}

impl ConceptGraph {
    /// Builds the graph: root→category edges labelled with the category,
    /// then category→leaf edges, in tree order.
    #[instrument(level = "debug", skip(tree), fields(root = tree.root()))]
    pub fn from_tree(tree: &ConceptTree) -> Self {
        let mut graph = Self::default();
        let root = graph.add_node(tree.root(), NodeKind::Root);
        graph.root = Some(root);

        for (category, related) in tree.categories() {
            let category_idx = graph.add_node(category.label(), NodeKind::Category(category));
            graph.add_edge(root, category_idx, Some(category.label().to_string()));
            for title in related {
                let leaf_idx = graph.add_node(title, NodeKind::Leaf);
                graph.add_edge(category_idx, leaf_idx, None);
            }
        }
        graph
    }

    fn add_node(&mut self, id: &str, kind: NodeKind) -> Index {
        if let Some(&existing) = self.by_id.get(id) {
            return existing;
        }
        let idx = self.arena.insert(ConceptNode {
            id: id.to_string(),
            kind,
            children: Vec::new(),
        });
        self.by_id.insert(id.to_string(), idx);
        self.order.push(idx);
        idx
    }

    fn add_edge(&mut self, from: Index, to: Index, label: Option<String>) {
        let (Some(from_id), Some(to_id)) = (
            self.arena.get(from).map(|n| n.id.clone()),
            self.arena.get(to).map(|n| n.id.clone()),
        ) else {
            return;
        };
        if let Some(parent) = self.arena.get_mut(from) {
            if !parent.children.contains(&to) {
                parent.children.push(to);
            }
        }
        self.edges.push(Edge {
            from: from_id,
            to: to_id,
            label,
        });
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&ConceptNode> {
        self.arena.get(idx)
    }

    pub fn find(&self, id: &str) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ConceptNode> + '_ {
        self.order.iter().filter_map(|&idx| self.arena.get(idx))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Pre-order traversal from the root; each node is visited once.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }
}

pub struct PreOrderIterator<'a> {
    graph: &'a ConceptGraph,
    stack: Vec<Index>,
    seen: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(graph: &'a ConceptGraph) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = graph.root() {
            stack.push(root);
        }
        Self {
            graph,
            stack,
            seen: Vec::new(),
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a ConceptNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if self.seen.contains(&current_idx) {
                continue;
            }
            if let Some(node) = self.graph.get_node(current_idx) {
                self.seen.push(current_idx);
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extractor::build_concept_tree;
    use crate::domain::Record;

    fn graph() -> ConceptGraph {
        let rows = vec![
            Record::new("A", "D1", "US", "Drama"),
            Record::new("B", "D1", "US", "Drama"),
            Record::new("C", "D2", "FR", "Drama"),
        ];
        ConceptGraph::from_tree(&build_concept_tree(&rows, "A"))
    }

    #[test]
    fn given_shared_leaf_when_building_graph_then_node_is_unique() {
        let graph = graph();

        // A, Director, Country, Genre, B, C
        assert_eq!(graph.node_count(), 6);
        // 3 labelled + B under each category + C under Genre
        assert_eq!(graph.edge_count(), 7);
        let incoming_b = graph.edges().iter().filter(|e| e.to == "B").count();
        assert_eq!(incoming_b, 3);
    }

    #[test]
    fn given_graph_when_listing_edges_then_only_category_edges_are_labelled() {
        let graph = graph();
        for edge in graph.edges() {
            if edge.from == "A" {
                assert_eq!(edge.label.as_deref(), Some(edge.to.as_str()));
            } else {
                assert!(edge.label.is_none());
            }
        }
    }

    #[test]
    fn given_graph_when_iterating_then_visits_each_node_once_in_preorder() {
        let graph = graph();
        let ids: Vec<_> = graph.iter().map(|(_, n)| n.id.as_str()).collect();
        assert_eq!(ids, ["A", "Director", "B", "Country", "Genre", "C"]);
    }
}
