//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid inputs to the core model.
///
/// Catalog data never produces a domain error: missing roots and empty
/// attributes are normal inputs that yield a degenerate tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("unknown category: {0} (expected Director, Country or Genre)")]
    UnknownCategory(String),

    #[error("invalid layout parameters: {message}")]
    InvalidLayout { message: String },
}
