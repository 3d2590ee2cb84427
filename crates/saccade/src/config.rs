use crate::color::{CategoryColors, INK, RED, Rgb};
use crate::loader::DataSource;
use crate::measure::{Measure, MeasureCatalog};
use crate::observation::LATENCY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SACCADE_EXPLORER_CONFIG";
pub const CONFIG_FILE: &str = "saccade-explorer.json";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Selection used before the user has clicked anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSelection {
    pub participant: String,
    /// Only used when the participant has no row in the data
    pub task: String,
    pub trial: i64,
}

impl Default for DefaultSelection {
    fn default() -> Self {
        Self {
            participant: "gapBL401ak".to_string(),
            task: "GAP".to_string(),
            trial: 1,
        }
    }
}

/// Everything configurable about the dashboard. Missing fields take their
/// default, so a config file may list only what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_source: DataSource,
    pub measures: MeasureCatalog,
    pub default_measure: Measure,
    pub category_colors: CategoryColors,
    pub highlight_color: Rgb,
    pub target_color: Rgb,
    pub histogram_bins: usize,
    pub marker_size: f32,
    pub opacity: f32,
    pub default_selection: DefaultSelection,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::default(),
            measures: MeasureCatalog::default(),
            default_measure: Measure::from(LATENCY),
            category_colors: CategoryColors::default(),
            highlight_color: RED,
            target_color: INK,
            histogram_bins: 10,
            marker_size: 15.0,
            opacity: 0.7,
            default_selection: DefaultSelection::default(),
        }
    }
}

impl DashboardConfig {
    /// The configured default measure, or the first catalog entry when the
    /// default is not in the catalog.
    pub fn initial_measure(&self) -> Measure {
        if self.measures.contains(&self.default_measure) {
            return self.default_measure.clone();
        }
        match self.measures.first() {
            Some(m) => {
                tracing::warn!(
                    default = %self.default_measure,
                    using = %m,
                    "default measure is not in the catalog"
                );
                m.clone()
            }
            None => self.default_measure.clone(),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn load_from_file(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let json_str =
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&json_str)?)
}

/// Load `path` when it exists; otherwise, or when it cannot be parsed,
/// use the defaults.
pub fn load_or_default(path: &Path) -> DashboardConfig {
    if path.exists() {
        match load_from_file(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "configuration loaded");
                return config;
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "{e}; using default configuration"
                );
            }
        }
    }
    DashboardConfig::default()
}

/// `$SACCADE_EXPLORER_CONFIG`, else `saccade-explorer.json`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}
