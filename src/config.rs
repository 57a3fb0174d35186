//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/reltree/reltree.toml`
//! 3. Local config: `./.reltree.toml`, or the file given with `--config`
//! 4. Environment variables: `RELTREE_*` prefix, `__` between sections
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ColumnMapping, OutputFormat, RenderSettings};
use crate::domain::LayoutParams;

/// Default catalog file name (Netflix titles export).
pub const DEFAULT_CATALOG: &str = "netflix_titles_nov_2019.csv";

/// Unified configuration for reltree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Catalog CSV file
    pub catalog: PathBuf,
    /// Default output format
    pub format: OutputFormat,
    /// Catalog header names
    pub columns: ColumnMapping,
    /// Layout spacing
    pub layout: LayoutParams,
    /// Drawing options
    pub render: RenderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG),
            format: OutputFormat::default(),
            columns: ColumnMapping::default(),
            layout: LayoutParams::default(),
            render: RenderSettings::default(),
        }
    }
}

/// Raw column mapping: `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawColumns {
    pub title: Option<String>,
    pub director: Option<String>,
    pub country: Option<String>,
    pub genres: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayout {
    pub vertical_spacing: Option<f64>,
    pub horizontal_spacing: Option<f64>,
    pub category_fan_width: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRender {
    pub wrap_width: Option<usize>,
    pub scale: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub catalog: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub columns: RawColumns,
    pub layout: RawLayout,
    pub render: RawRender,
}

/// Get the XDG config directory for reltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "reltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("reltree.toml"))
}

/// Get the path to the local config file in the working directory.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(".reltree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.catalog.to_string_lossy().as_ref());
        self.catalog = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let columns = &overlay.columns;
        let layout = &overlay.layout;
        let render = &overlay.render;
        Self {
            catalog: overlay
                .catalog
                .clone()
                .unwrap_or_else(|| self.catalog.clone()),
            format: overlay.format.unwrap_or(self.format),
            columns: ColumnMapping {
                title: columns
                    .title
                    .clone()
                    .unwrap_or_else(|| self.columns.title.clone()),
                director: columns
                    .director
                    .clone()
                    .unwrap_or_else(|| self.columns.director.clone()),
                country: columns
                    .country
                    .clone()
                    .unwrap_or_else(|| self.columns.country.clone()),
                genres: columns
                    .genres
                    .clone()
                    .unwrap_or_else(|| self.columns.genres.clone()),
            },
            layout: LayoutParams {
                vertical_spacing: layout
                    .vertical_spacing
                    .unwrap_or(self.layout.vertical_spacing),
                horizontal_spacing: layout
                    .horizontal_spacing
                    .unwrap_or(self.layout.horizontal_spacing),
                category_fan_width: layout
                    .category_fan_width
                    .unwrap_or(self.layout.category_fan_width),
            },
            render: RenderSettings {
                wrap_width: render.wrap_width.unwrap_or(self.render.wrap_width),
                scale: render.scale.unwrap_or(self.render.scale),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Explicit local config file; must exist when given.
    ///   Without it, `./.reltree.toml` is used if present.
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        match local_config {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                let path = local_config_path();
                if path.exists() {
                    current = current.merge_with(&load_raw_settings(&path)?);
                }
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.layout.validate()?;
        Ok(current)
    }

    /// Defaults overlaid with a single config file (no global config, no env vars).
    pub fn load_from(path: &Path) -> Result<Self, ApplicationError> {
        let mut settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.expand_paths();
        settings.layout.validate()?;
        Ok(settings)
    }

    /// Apply RELTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("RELTREE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("catalog") {
            settings.catalog = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("format") {
            settings.format = match val.to_ascii_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                "svg" => OutputFormat::Svg,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!("RELTREE_FORMAT: unknown format '{other}'"),
                    })
                }
            };
        }
        if let Ok(val) = config.get_string("columns.title") {
            settings.columns.title = val;
        }
        if let Ok(val) = config.get_string("columns.director") {
            settings.columns.director = val;
        }
        if let Ok(val) = config.get_string("columns.country") {
            settings.columns.country = val;
        }
        if let Ok(val) = config.get_string("columns.genres") {
            settings.columns.genres = val;
        }
        if let Ok(val) = config.get_float("layout.vertical_spacing") {
            settings.layout.vertical_spacing = val;
        }
        if let Ok(val) = config.get_float("layout.horizontal_spacing") {
            settings.layout.horizontal_spacing = val;
        }
        if let Ok(val) = config.get_float("layout.category_fan_width") {
            settings.layout.category_fan_width = val;
        }
        if let Ok(val) = config.get_int("render.wrap_width") {
            settings.render.wrap_width = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("RELTREE_RENDER__WRAP_WIDTH: invalid width {val}"),
            })?;
        }
        if let Ok(val) = config.get_float("render.scale") {
            settings.render.scale = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# reltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/reltree/reltree.toml
#   Local:  ./.reltree.toml (or --config <file>)
#   Env:    RELTREE_* environment variables, e.g. RELTREE_LAYOUT__VERTICAL_SPACING=2.0

# Catalog CSV export
# catalog = "netflix_titles_nov_2019.csv"

# Output format: text, json or svg
# format = "text"

[columns]
# title = "title"
# director = "director"
# country = "country"
# genres = "listed_in"

[layout]
# vertical_spacing = 1.5
# horizontal_spacing = 1.2
# category_fan_width = 3.5

[render]
# wrap_width = 15
# scale = 120.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_overlay_when_merging_then_keeps_defaults() {
        let settings = Settings::default().merge_with(&RawSettings::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_overrides_only_given_fields() {
        let raw: RawSettings = toml::from_str(
            r#"
catalog = "movies.csv"
format = "svg"

[columns]
genres = "genre"

[layout]
vertical_spacing = 2.0
"#,
        )
        .unwrap();

        let settings = Settings::default().merge_with(&raw);

        assert_eq!(settings.catalog, PathBuf::from("movies.csv"));
        assert_eq!(settings.format, OutputFormat::Svg);
        assert_eq!(settings.columns.genres, "genre");
        assert_eq!(settings.columns.title, "title");
        assert_eq!(settings.layout.vertical_spacing, 2.0);
        assert_eq!(settings.layout.horizontal_spacing, 1.2);
        assert_eq!(settings.render, RenderSettings::default());
    }

    #[test]
    fn given_tilde_in_catalog_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            catalog: PathBuf::from("~/data/titles.csv"),
            ..Settings::default()
        };

        settings.expand_paths();

        assert!(!settings.catalog.to_string_lossy().starts_with('~'));
        assert!(settings.catalog.ends_with("data/titles.csv"));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: Result<RawSettings, _> = toml::from_str(&Settings::template());
        assert!(raw.is_ok());
    }

    #[test]
    fn given_defaults_when_serialized_then_round_trips_through_raw() {
        let text = Settings::default().to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }
}
