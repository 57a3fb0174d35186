//! reltree: which titles of a catalog are related to a given title, and through
//! which attribute (director, country, genre), laid out as a two-level tree.
//!
//! Data flows one way: record table → [`domain::ConceptTree`] → [`domain::PositionMap`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
