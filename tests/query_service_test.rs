//! Tests for QueryService

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use reltree::application::services::QueryService;
use reltree::application::{ApplicationError, ColumnMapping};
use reltree::config::Settings;
use reltree::domain::{Category, LayoutParams, Point};
use reltree::infrastructure::traits::RealFileSystem;
use reltree::util::testing::{init_test_setup, sample_csv, sample_table};

fn service_for(catalog: PathBuf) -> QueryService {
    let settings = Settings {
        catalog,
        ..Settings::default()
    };
    QueryService::new(Arc::new(RealFileSystem), Arc::new(settings))
}

fn write_catalog(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("titles.csv");
    std::fs::write(&path, content).expect("write catalog");
    path
}

#[test]
fn given_catalog_file_when_running_query_then_builds_tree_layout_and_graph() {
    init_test_setup();
    // Arrange
    let temp = TempDir::new().unwrap();
    let service = service_for(write_catalog(&temp, &sample_csv()));

    // Act
    let output = service.run("A").unwrap();

    // Assert
    assert!(output.root_found);
    assert_eq!(output.tree.related(Category::Genre), ["B", "C"]);
    assert_eq!(output.positions.get("A"), Some(Point::ORIGIN));
    assert_eq!(output.graph.node_count(), 6);
    assert_eq!(output.positions.len(), output.graph.node_count());
}

#[test]
fn given_catalog_file_when_loading_then_records_match_source_order() {
    let temp = TempDir::new().unwrap();
    let service = service_for(write_catalog(&temp, &sample_csv()));

    let records = service.load_catalog().unwrap();

    assert_eq!(records, sample_table());
}

#[test]
fn given_unknown_title_when_querying_then_returns_degenerate_output() {
    // Arrange
    let service = service_for(PathBuf::from("unused.csv"));

    // Act
    let output = service.query(&sample_table(), "Zzz");

    // Assert
    assert!(!output.root_found);
    assert!(output.tree.is_empty());
    assert_eq!(output.positions.len(), 4);
    assert_eq!(output.graph.edge_count(), 3);
}

#[test]
fn given_missing_catalog_when_running_query_then_errors_with_not_found() {
    let temp = TempDir::new().unwrap();
    let service = service_for(temp.path().join("nope.csv"));

    let result = service.run("A");

    assert!(matches!(result, Err(ApplicationError::CatalogNotFound(_))));
}

#[test]
fn given_custom_columns_and_spacing_when_running_query_then_settings_apply() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let catalog = write_catalog(
        &temp,
        "name,made_by,origin,genre\nA,D1,US,Drama\nB,D1,FR,Drama\n",
    );
    let settings = Settings {
        catalog,
        columns: ColumnMapping {
            title: "name".into(),
            director: "made_by".into(),
            country: "origin".into(),
            genres: "genre".into(),
        },
        layout: LayoutParams {
            vertical_spacing: 3.0,
            ..LayoutParams::default()
        },
        ..Settings::default()
    };
    let service = QueryService::new(Arc::new(RealFileSystem), Arc::new(settings));

    // Act
    let output = service.run("A").unwrap();

    // Assert
    assert_eq!(output.tree.related(Category::Director), ["B"]);
    assert!(output.tree.related(Category::Country).is_empty());
    assert_eq!(output.positions.get("Director").unwrap().y, -3.0);
}
