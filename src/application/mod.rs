//! Application layer: catalog loading, query service and rendering
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod catalog;
pub mod error;
pub mod error_ext;
pub mod render;
pub mod services;

pub use catalog::{ColumnMapping, CsvCatalog};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use render::{render, wrap_label, OutputFormat, RenderSettings};
