use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::DatasetKind;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "HYDROSCOPE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "hydroscope.toml";

// ---------------------------------------------------------------------------
// Config file layout
// ---------------------------------------------------------------------------

/// Contents of `hydroscope.toml`. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub data: DataPaths,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// 3D scene dimensions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub well_radius: f64,
    /// Half-width of the soil layer boxes in x and y.
    pub extent: f64,
    pub cylinder_segments: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            well_radius: 0.5,
            extent: 30.0,
            cylinder_segments: 16,
        }
    }
}

/// Datasets to load at startup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub well: Option<PathBuf>,
    pub soil: Option<PathBuf>,
    pub precipitation: Option<PathBuf>,
    pub infiltration: Option<PathBuf>,
}

impl DataPaths {
    /// Configured paths in load order.
    pub fn entries(&self) -> Vec<(DatasetKind, &Path)> {
        DatasetKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let path = match kind {
                    DatasetKind::Well => &self.well,
                    DatasetKind::Soil => &self.soil,
                    DatasetKind::Precipitation => &self.precipitation,
                    DatasetKind::Infiltration => &self.infiltration,
                };
                path.as_deref().map(|p| (kind, p))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Load from `$HYDROSCOPE_CONFIG` or `./hydroscope.toml`.
    /// A missing file gives the defaults; a broken one is logged and ignored.
    pub fn load_or_default() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {e:#}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [scene]
            well_radius = 1.25

            [data]
            soil = "surveys/soil.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.scene.well_radius, 1.25);
        assert_eq!(config.scene.extent, 30.0);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(
            config.data.entries(),
            vec![(DatasetKind::Soil, Path::new("surveys/soil.csv"))]
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_toml("[scene]\nwell_radius = \"wide\"").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydroscope.toml");
        std::fs::write(&path, "[window]\nwidth = 640.0\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.window.width, 640.0);
        assert_eq!(config.window.height, 800.0);
    }
}
