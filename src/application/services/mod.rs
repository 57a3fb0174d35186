//! Application services

pub mod query;

pub use query::{QueryOutput, QueryService};
