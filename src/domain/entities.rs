//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::domain::error::DomainError;

/// One row of the catalog.
///
/// Fields that are absent in the source are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub director: String,
    pub country: String,
    /// Comma-joined genre tags, kept verbatim from the source
    pub genres: String,
}

impl Record {
    pub fn new(
        title: impl Into<String>,
        director: impl Into<String>,
        country: impl Into<String>,
        genres: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            director: director.into(),
            country: country.into(),
            genres: genres.into(),
        }
    }
}

/// Attribute bucket connecting the root to its related titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Director,
    Country,
    Genre,
}

impl Category {
    /// All categories in tree order.
    pub const ALL: [Category; 3] = [Category::Director, Category::Country, Category::Genre];

    /// Display label, also used as the node identifier of the category node.
    pub fn label(self) -> &'static str {
        match self {
            Category::Director => "Director",
            Category::Country => "Country",
            Category::Genre => "Genre",
        }
    }

    /// Position of the category within [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::Director => 0,
            Category::Country => 1,
            Category::Genre => 2,
        }
    }

    /// The record field this category reads.
    pub fn attribute(self, record: &Record) -> &str {
        match self {
            Category::Director => &record.director,
            Category::Country => &record.country,
            Category::Genre => &record.genres,
        }
    }

    /// Whether `record` shares the root's attribute value for this category.
    ///
    /// Director and country compare exactly. Genre splits the root value on
    /// commas and matches if any trimmed tag is contained in the record's raw
    /// genre field. An empty root value never matches.
    pub fn matches(self, root_value: &str, record: &Record) -> bool {
        if root_value.is_empty() {
            return false;
        }
        let candidate = self.attribute(record);
        match self {
            Category::Director | Category::Country => candidate == root_value,
            Category::Genre => root_value
                .split(',')
                .any(|tag| candidate.contains(tag.trim())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// Two-level tree: root title → category → related titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptTree {
    root: String,
    branches: [Vec<String>; 3],
}

impl ConceptTree {
    /// Tree with all three categories present and empty.
    pub fn empty(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            branches: Default::default(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn related(&self, category: Category) -> &[String] {
        &self.branches[category.index()]
    }

    pub(crate) fn set_related(&mut self, category: Category, titles: Vec<String>) {
        self.branches[category.index()] = titles;
    }

    /// Categories with their related titles, in fixed order.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        Category::ALL
            .into_iter()
            .map(move |c| (c, self.related(c)))
    }

    /// True when no category has a related title.
    pub fn is_empty(&self) -> bool {
        self.branches.iter().all(Vec::is_empty)
    }

    /// Root, categories and leaf entries (repeated leaves counted per occurrence).
    pub fn node_count(&self) -> usize {
        1 + Category::ALL.len() + self.branches.iter().map(Vec::len).sum::<usize>()
    }
}

/// Serializes as `{root: {"Director": [...], "Country": [...], "Genre": [...]}}`.
impl Serialize for ConceptTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Branches<'a>(&'a ConceptTree);

        impl Serialize for Branches<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
                for (category, titles) in self.0.categories() {
                    map.serialize_entry(category.label(), titles)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.root, &Branches(self))?;
        map.end()
    }
}

/// 2D coordinate of a laid-out node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node identifier → coordinate, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PositionMap {
    positions: IndexMap<String, Point>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.positions.iter().map(|(id, p)| (id.as_str(), *p))
    }

    /// Returns the stored coordinate of `id`, computing and storing it first
    /// if absent. An existing coordinate is never replaced.
    pub fn get_or_insert_with(&mut self, id: &str, place: impl FnOnce() -> Point) -> Point {
        if let Some(existing) = self.positions.get(id) {
            return *existing;
        }
        let point = place();
        self.positions.insert(id.to_string(), point);
        point
    }
}

impl FromIterator<(String, Point)> for PositionMap {
    fn from_iter<T: IntoIterator<Item = (String, Point)>>(iter: T) -> Self {
        let mut map = PositionMap::new();
        for (id, point) in iter {
            map.get_or_insert_with(&id, || point);
        }
        map
    }
}
