//! Domain layer: entities, relationship extraction and layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod layout;

pub use entities::{Category, ConceptTree, Point, PositionMap, Record};
pub use error::DomainError;
pub use extractor::{build_concept_tree, RelationshipExtractor, MAX_RELATED};
pub use graph::{ConceptGraph, ConceptNode, Edge, NodeKind};
pub use layout::{layout, layout_default, LayoutParams};
