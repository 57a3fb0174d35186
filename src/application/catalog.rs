//! Catalog loading: CSV export → ordered record table

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Record;
use crate::infrastructure::traits::FileSystem;

/// Header names of the columns read from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnMapping {
    pub title: String,
    pub director: String,
    pub country: String,
    /// Comma-joined genre list (`listed_in` in the Netflix export)
    pub genres: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            title: "title".into(),
            director: "director".into(),
            country: "country".into(),
            genres: "listed_in".into(),
        }
    }
}

/// Column positions resolved against a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    title: usize,
    director: Option<usize>,
    country: Option<usize>,
    genres: Option<usize>,
}

impl ColumnIndices {
    fn resolve(
        headers: &csv::StringRecord,
        mapping: &ColumnMapping,
        path: &Path,
    ) -> ApplicationResult<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let title = position(&mapping.title).ok_or_else(|| ApplicationError::Catalog {
            path: path.to_path_buf(),
            message: format!("missing required column '{}'", mapping.title),
        })?;

        let optional = |name: &str| {
            let idx = position(name);
            if idx.is_none() {
                warn!("column '{}' not found in {}, treating as empty", name, path.display());
            }
            idx
        };

        Ok(Self {
            title,
            director: optional(&mapping.director),
            country: optional(&mapping.country),
            genres: optional(&mapping.genres),
        })
    }

    fn record(&self, row: &csv::StringRecord) -> Record {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };
        Record {
            title: cell(Some(self.title)),
            director: cell(self.director),
            country: cell(self.country),
            genres: cell(self.genres),
        }
    }
}

/// CSV catalog reader.
pub struct CsvCatalog;

impl CsvCatalog {
    /// Parse CSV content with a header row into records, in file order.
    ///
    /// Short rows yield empty strings for their missing cells. Rows the CSV
    /// parser cannot decode are skipped with a warning.
    pub fn parse(content: &str, mapping: &ColumnMapping, path: &Path) -> ApplicationResult<Vec<Record>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ApplicationError::Catalog {
                path: path.to_path_buf(),
                message: format!("read header: {e}"),
            })?
            .clone();
        let columns = ColumnIndices::resolve(&headers, mapping, path)?;

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            match result {
                Ok(row) => records.push(columns.record(&row)),
                Err(e) => warn!("skipping row {} of {}: {}", idx + 1, path.display(), e),
            }
        }
        debug!("parsed {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read and parse the catalog at `path`.
    #[instrument(level = "debug", skip(fs, mapping))]
    pub fn load(fs: &dyn FileSystem, path: &Path, mapping: &ColumnMapping) -> ApplicationResult<Vec<Record>> {
        if !fs.is_file(path) {
            return Err(ApplicationError::CatalogNotFound(path.to_path_buf()));
        }
        let content = fs.read_to_string(path).with_path_context("read catalog", path)?;
        Self::parse(&content, mapping, path)
    }
}
