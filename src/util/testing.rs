//! Shared test setup: logging and catalog fixtures.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::Record;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "reltree=trace");
        }
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Three-row table used throughout the tests:
/// A and B share director, country and a genre tag; C only shares a genre tag with A.
pub fn sample_table() -> Vec<Record> {
    vec![
        Record::new("A", "D1", "US", "Drama"),
        Record::new("B", "D1", "US", "Comedy, Drama"),
        Record::new("C", "D2", "FR", "Dramas"),
    ]
}

/// CSV rendition of [`sample_table`] with the Netflix export's header names.
pub fn sample_csv() -> String {
    let mut csv = String::from("show_id,title,director,country,listed_in\n");
    for (i, r) in sample_table().iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},\"{}\"\n",
            i + 1,
            r.title,
            r.director,
            r.country,
            r.genres
        ));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_sample_csv_when_reading_header_then_uses_catalog_columns() {
        let csv = sample_csv();
        assert!(csv.starts_with("show_id,title,director,country,listed_in\n"));
        assert_eq!(csv.lines().count(), 4);
    }
}
