use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::dataset::{LineWidth, PlotType};

/// Default file the binary looks for in the working directory.
pub const CONFIG_FILE: &str = "scopegraph.json";

/// User-tunable graph settings. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Pixel distance within which a press grabs a range marker.
    pub hit_tolerance_px: f32,
    /// Screen offset of the delta label from the marker midpoint.
    pub delta_label_offset_px: [f32; 2],
    pub line_width: LineWidth,
    pub plot_type: PlotType,
    pub initial_x_range: [f64; 2],
    pub initial_y_range: [f64; 2],
    /// Period of the demo acquisition tick.
    pub live_tick_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            hit_tolerance_px: 6.0,
            delta_label_offset_px: [8.0, -8.0],
            line_width: LineWidth::Normal,
            plot_type: PlotType::Time,
            initial_x_range: [0.0, 1.0],
            initial_y_range: [0.0, 1.0],
            live_tick_ms: 50,
        }
    }
}

impl GraphConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `path`, falling back to defaults if it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: GraphConfig =
            serde_json::from_str(r#"{ "hit_tolerance_px": 10.0, "line_width": "Larger" }"#).unwrap();
        assert_eq!(config.hit_tolerance_px, 10.0);
        assert_eq!(config.line_width, LineWidth::Larger);
        assert_eq!(config.plot_type, PlotType::Time);
        assert_eq!(config.live_tick_ms, 50);
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir().join(format!("scopegraph-{}.json", uuid::Uuid::new_v4()));
        let config = GraphConfig {
            plot_type: PlotType::FftPhaseUnwrapped,
            initial_x_range: [-2.0, 2.0],
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(GraphConfig::load(&path).unwrap(), config);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_or_broken_file_uses_defaults() {
        let dir = std::env::temp_dir();
        let missing = dir.join(format!("scopegraph-missing-{}.json", uuid::Uuid::new_v4()));
        assert_eq!(GraphConfig::load_or_default(&missing), GraphConfig::default());

        let broken = dir.join(format!("scopegraph-broken-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(GraphConfig::load(&broken), Err(ConfigError::Parse(_))));
        assert_eq!(GraphConfig::load_or_default(&broken), GraphConfig::default());
        std::fs::remove_file(&broken).unwrap();
    }
}
