//! Tests for output rendering

use std::path::PathBuf;
use std::sync::Arc;

use reltree::application::render::{render_json, render_svg, render_text};
use reltree::application::services::{QueryOutput, QueryService};
use reltree::application::{render, OutputFormat, RenderSettings};
use reltree::config::Settings;
use reltree::infrastructure::traits::RealFileSystem;
use reltree::util::testing::sample_table;

fn query(title: &str) -> QueryOutput {
    let settings = Settings {
        catalog: PathBuf::from("unused.csv"),
        ..Settings::default()
    };
    QueryService::new(Arc::new(RealFileSystem), Arc::new(settings)).query(&sample_table(), title)
}

#[test]
fn given_tree_when_rendering_text_then_lists_categories_and_titles() {
    let text = render_text(&query("A").tree);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "A");
    assert!(text.contains("Director"));
    assert!(text.contains("Country"));
    assert!(text.contains("Genre"));
    assert_eq!(text.matches('B').count(), 3);
    assert!(lines.iter().any(|l| l.ends_with("C")));
}

#[test]
fn given_empty_tree_when_rendering_text_then_marks_categories_empty() {
    let text = render_text(&query("Missing").tree);

    assert_eq!(text.matches("(none)").count(), 3);
}

#[test]
fn given_output_when_rendering_json_then_contains_tree_nodes_and_links() {
    // Act
    let json = render_json(&query("A")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    // Assert
    assert_eq!(
        value["tree"],
        serde_json::json!({"A": {"Director": ["B"], "Country": ["B"], "Genre": ["B", "C"]}})
    );
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    assert_eq!(nodes[0]["id"], "A");
    assert_eq!(nodes[0]["kind"], "root");
    assert_eq!(nodes[0]["x"], 0.0);

    let links = value["links"].as_array().unwrap();
    assert_eq!(links.len(), 7);
    assert_eq!(links[0]["source"], "A");
    assert_eq!(links[0]["target"], "Director");
    assert_eq!(links[0]["label"], "Director");
    assert!(links
        .iter()
        .filter(|l| l["source"] != "A")
        .all(|l| l.get("label").is_none()));
}

#[test]
fn given_output_when_rendering_svg_then_draws_every_node_and_edge() {
    let output = query("A");

    let svg = render_svg(&output, &RenderSettings::default());

    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<circle").count(), 6);
    assert_eq!(svg.matches("<line").count(), 7);
    assert_eq!(svg.matches(r#"fill="red""#).count(), 3);
}

#[test]
fn given_long_title_when_rendering_svg_then_label_is_wrapped_and_escaped() {
    let mut table = sample_table();
    table.push(reltree::domain::Record::new(
        "Tom & Jerry: The Long Way Home",
        "D1",
        "",
        "",
    ));
    let settings = Settings {
        catalog: PathBuf::from("unused.csv"),
        ..Settings::default()
    };
    let output = QueryService::new(Arc::new(RealFileSystem), Arc::new(settings)).query(&table, "A");

    let svg = render_svg(&output, &RenderSettings::default());

    assert!(svg.contains("Tom &amp; Jerry:"));
    assert!(svg.contains(">The Long Way<"));
    assert!(!svg.contains("Tom & Jerry"));
}

#[test]
fn given_format_when_rendering_then_dispatches() {
    let output = query("A");
    let settings = RenderSettings::default();

    let text = render(&output, OutputFormat::Text, &settings).unwrap();
    let json = render(&output, OutputFormat::Json, &settings).unwrap();
    let svg = render(&output, OutputFormat::Svg, &settings).unwrap();

    assert!(text.starts_with('A'));
    assert!(json.starts_with('{'));
    assert!(svg.starts_with("<svg"));
}
