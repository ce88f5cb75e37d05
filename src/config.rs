use anyhow::{Context, Result};
use graph::Geometry;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Settings read from an optional TOML file; CLI flags override them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Commits requested per page
    pub page_size: usize,
    /// Pages loaded before printing
    pub pages: usize,
    /// Plain ASCII glyphs instead of box drawing
    pub ascii: bool,
    /// Display width of the message column
    pub message_width: usize,
    pub geometry: Geometry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            pages: 1,
            ascii: false,
            message_width: 72,
            geometry: Geometry::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_geometry_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            page_size = 25
            ascii = true

            [geometry]
            rail_width = 12.0
            "#,
        )
        .unwrap();

        assert_eq!(config.page_size, 25);
        assert!(config.ascii);
        assert_eq!(config.pages, 1);
        assert_eq!(config.geometry.rail_width, 12.0);
        assert_eq!(config.geometry.row_height, Geometry::default().row_height);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::from_toml("page_size = \"many\"").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pages = 3").unwrap();
        let config = Config::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.pages, 3);
        assert!(Config::load_or_default(None).is_ok());
    }
}
