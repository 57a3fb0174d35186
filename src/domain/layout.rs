//! Deterministic layered layout for concept trees.
//!
//! The root sits at the top (y = 0 unless a prior map placed it elsewhere),
//! categories one level below and leaves one level below their category.
//! Siblings fan out horizontally around their parent's x coordinate.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::entities::{ConceptTree, Point, PositionMap};
use crate::domain::error::DomainError;

/// Spacing constants of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Vertical distance between tree levels
    pub vertical_spacing: f64,
    /// Total horizontal fan-out of the leaves under one category
    pub horizontal_spacing: f64,
    /// Total horizontal fan-out of the categories under the root
    pub category_fan_width: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            vertical_spacing: 1.5,
            horizontal_spacing: 1.2,
            category_fan_width: 3.5,
        }
    }
}

impl LayoutParams {
    /// Rejects non-finite or negative spacings.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("vertical_spacing", self.vertical_spacing),
            ("horizontal_spacing", self.horizontal_spacing),
            ("category_fan_width", self.category_fan_width),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidLayout {
                    message: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Assigns a coordinate to every node of `tree`.
///
/// Positions already present in `existing` are kept; only nodes without a
/// coordinate are placed. A title listed under several categories keeps the
/// position of its first occurrence in category order.
#[instrument(level = "debug", skip(tree, existing), fields(root = tree.root()))]
pub fn layout(tree: &ConceptTree, params: &LayoutParams, existing: Option<PositionMap>) -> PositionMap {
    let mut positions = existing.unwrap_or_default();
    let root = positions.get_or_insert_with(tree.root(), || Point::ORIGIN);

    let categories: Vec<_> = tree.categories().collect();
    let k = categories.len();
    let category_spacing = params.category_fan_width / k.max(1) as f64;

    for (i, (category, related)) in categories.into_iter().enumerate() {
        let anchor = positions.get_or_insert_with(category.label(), || {
            Point::new(
                root.x + (i as f64 - k as f64 / 2.0) * category_spacing,
                root.y - params.vertical_spacing,
            )
        });

        let m = related.len();
        if m == 0 {
            continue;
        }
        let leaf_spacing = params.horizontal_spacing / m.max(1) as f64;
        for (j, title) in related.iter().enumerate() {
            positions.get_or_insert_with(title, || {
                Point::new(
                    anchor.x + (j as f64 - m as f64 / 2.0) * leaf_spacing,
                    anchor.y - params.vertical_spacing,
                )
            });
        }
    }

    positions
}

/// [`layout`] with default spacing and no prior positions.
pub fn layout_default(tree: &ConceptTree) -> PositionMap {
    layout(tree, &LayoutParams::default(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Category;

    fn assert_close(actual: Point, x: f64, y: f64) {
        assert!((actual.x - x).abs() < 1e-9, "x: {} != {}", actual.x, x);
        assert!((actual.y - y).abs() < 1e-9, "y: {} != {}", actual.y, y);
    }

    #[test]
    fn given_empty_tree_when_laying_out_then_places_root_and_categories() {
        let tree = ConceptTree::empty("Root");
        let positions = layout_default(&tree);

        assert_eq!(positions.len(), 4);
        assert_close(positions.get("Root").unwrap(), 0.0, 0.0);
        let spacing = 3.5 / 3.0;
        assert_close(positions.get("Director").unwrap(), -1.5 * spacing, -1.5);
        assert_close(positions.get("Country").unwrap(), -0.5 * spacing, -1.5);
        assert_close(positions.get("Genre").unwrap(), 0.5 * spacing, -1.5);
    }

    #[test]
    fn given_two_leaves_when_laying_out_then_spreads_around_category() {
        let mut tree = ConceptTree::empty("Root");
        tree.set_related(Category::Genre, vec!["B".into(), "C".into()]);
        let positions = layout_default(&tree);

        let genre = positions.get("Genre").unwrap();
        assert_close(positions.get("B").unwrap(), genre.x - 0.6, -3.0);
        assert_close(positions.get("C").unwrap(), genre.x, -3.0);
    }

    #[test]
    fn given_prior_root_position_when_laying_out_then_fans_out_from_it() {
        let mut prior = PositionMap::new();
        prior.get_or_insert_with("Root", || Point::new(10.0, 5.0));
        let tree = ConceptTree::empty("Root");

        let positions = layout(&tree, &LayoutParams::default(), Some(prior));

        assert_close(positions.get("Root").unwrap(), 10.0, 5.0);
        assert_close(positions.get("Country").unwrap(), 10.0 - 0.5 * 3.5 / 3.0, 3.5);
    }

    #[test]
    fn given_negative_spacing_when_validating_then_errors() {
        let params = LayoutParams {
            vertical_spacing: -1.0,
            ..LayoutParams::default()
        };
        assert!(params.validate().is_err());
        assert!(LayoutParams::default().validate().is_ok());
    }
}
