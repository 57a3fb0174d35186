//! Output rendering: terminal tree, JSON graph document and SVG drawing.

use std::fmt::Write as _;

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::application::services::QueryOutput;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ConceptTree, NodeKind, Point};

/// Output format of a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree on the terminal
    #[default]
    Text,
    /// Tree, positioned nodes and links as JSON
    Json,
    /// Laid-out drawing as SVG
    Svg,
}

/// Drawing options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Maximum label line length in characters
    pub wrap_width: usize,
    /// Pixels per layout unit
    pub scale: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            wrap_width: 15,
            scale: 120.0,
        }
    }
}

/// Greedy word wrap. Words longer than `width` are split across lines.
pub fn wrap_label(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(width) {
            let piece: String = chunk.iter().collect();
            let current_len = current.chars().count();
            if current.is_empty() {
                current = piece;
            } else if current_len + 1 + chunk.len() <= width {
                current.push(' ');
                current.push_str(&piece);
            } else {
                lines.push(std::mem::replace(&mut current, piece));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render `output` in the requested format.
pub fn render(
    output: &QueryOutput,
    format: OutputFormat,
    settings: &RenderSettings,
) -> ApplicationResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(&output.tree)),
        OutputFormat::Json => render_json(output),
        OutputFormat::Svg => Ok(render_svg(output, settings)),
    }
}

/// Root, categories and related titles as a terminal tree.
pub fn render_text(tree: &ConceptTree) -> String {
    let branches = tree.categories().map(|(category, related)| {
        let leaves = if related.is_empty() {
            vec![Tree::new("(none)".to_string())]
        } else {
            related.iter().map(|t| Tree::new(t.clone())).collect()
        };
        Tree::new(category.label().to_string()).with_leaves(leaves)
    });
    Tree::new(tree.root().to_string())
        .with_leaves(branches)
        .to_string()
}

#[derive(Serialize)]
struct GraphDocument<'a> {
    tree: &'a ConceptTree,
    nodes: Vec<NodeDocument<'a>>,
    links: Vec<LinkDocument<'a>>,
}

#[derive(Serialize)]
struct NodeDocument<'a> {
    id: &'a str,
    kind: &'static str,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct LinkDocument<'a> {
    source: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
}

/// Tree mapping plus positioned `nodes` and `links`.
pub fn render_json(output: &QueryOutput) -> ApplicationResult<String> {
    let nodes = output
        .graph
        .nodes()
        .filter_map(|node| {
            output.positions.get(&node.id).map(|p| NodeDocument {
                id: &node.id,
                kind: node.kind.as_str(),
                x: p.x,
                y: p.y,
            })
        })
        .collect();
    let links = output
        .graph
        .edges()
        .iter()
        .map(|e| LinkDocument {
            source: &e.from,
            target: &e.to,
            label: e.label.as_deref(),
        })
        .collect();

    let document = GraphDocument {
        tree: &output.tree,
        nodes,
        links,
    };
    serde_json::to_string_pretty(&document).map_err(|e| ApplicationError::Render {
        message: format!("serialize graph: {e}"),
    })
}

const MARGIN: f64 = 80.0;
const LINE_HEIGHT: f64 = 14.0;
const CHAR_WIDTH: f64 = 7.0;

/// Maps layout coordinates to SVG pixels (y grows downward).
struct Viewport {
    min_x: f64,
    max_y: f64,
    scale: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    fn fit(points: impl Iterator<Item = Point>, scale: f64) -> Self {
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
        for (i, p) in points.enumerate() {
            if i == 0 {
                (min_x, max_x, min_y, max_y) = (p.x, p.x, p.y, p.y);
            }
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Self {
            min_x,
            max_y,
            scale,
            width: (max_x - min_x) * scale + 2.0 * MARGIN,
            height: (max_y - min_y) * scale + 2.0 * MARGIN,
        }
    }

    fn project(&self, p: Point) -> (f64, f64) {
        (
            (p.x - self.min_x) * self.scale + MARGIN,
            (self.max_y - p.y) * self.scale + MARGIN,
        )
    }
}

fn escape_xml(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&apos;".to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// Edges, nodes with wrapped boxed labels, and red category labels on
/// root→category edges.
pub fn render_svg(output: &QueryOutput, settings: &RenderSettings) -> String {
    let view = Viewport::fit(output.positions.iter().map(|(_, p)| p), settings.scale);
    let radius = (settings.scale * 0.25).max(4.0);
    let mut svg = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" font-family="sans-serif" font-size="10">"#,
        view.width, view.height
    );

    let _ = writeln!(svg, r##"<g stroke="#555555">"##);
    for edge in output.graph.edges() {
        let (Some(from), Some(to)) = (output.positions.get(&edge.from), output.positions.get(&edge.to)) else {
            continue;
        };
        let ((x1, y1), (x2, y2)) = (view.project(from), view.project(to));
        let _ = writeln!(svg, r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}"/>"#);
    }
    let _ = writeln!(svg, "</g>");

    for edge in output.graph.edges() {
        let (Some(label), Some(from), Some(to)) = (
            edge.label.as_deref(),
            output.positions.get(&edge.from),
            output.positions.get(&edge.to),
        ) else {
            continue;
        };
        let ((x1, y1), (x2, y2)) = (view.project(from), view.project(to));
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" fill="red" text-anchor="middle">{}</text>"#,
            (x1 + x2) / 2.0,
            (y1 + y2) / 2.0,
            escape_xml(label)
        );
    }

    for node in output.graph.nodes() {
        let Some(point) = output.positions.get(&node.id) else {
            continue;
        };
        let (cx, cy) = view.project(point);
        let _ = writeln!(
            svg,
            r#"<circle class="{}" cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="lightblue"/>"#,
            node.kind.as_str()
        );

        let lines = wrap_label(&node.id, settings.wrap_width);
        if lines.is_empty() {
            continue;
        }
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
        let box_width = longest * CHAR_WIDTH + 8.0;
        let box_height = lines.len() as f64 * LINE_HEIGHT + 6.0;
        let weight = if node.kind == NodeKind::Root { "bold" } else { "normal" };
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{box_width:.1}" height="{box_height:.1}" rx="4" fill="white" stroke="black"/>"#,
            cx - box_width / 2.0,
            cy - box_height / 2.0,
        );
        let first_y = cy - (lines.len() as f64 - 1.0) * LINE_HEIGHT / 2.0;
        let spans = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                format!(
                    r#"<tspan x="{cx:.1}" y="{:.1}">{}</tspan>"#,
                    first_y + i as f64 * LINE_HEIGHT,
                    escape_xml(line)
                )
            })
            .join("");
        let _ = writeln!(
            svg,
            r#"<text text-anchor="middle" dominant-baseline="middle" font-weight="{weight}">{spans}</text>"#
        );
    }

    svg.push_str("</svg>\n");
    svg
}
