//! Application configuration.
//!
//! Pixel ceilings, ladder steps and estimator timing are plain values here
//! and are passed explicitly into the budget, exporter and estimator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where exported collages are written.
    pub output_dir: PathBuf,

    /// Export defaults.
    pub export: ExportDefaults,

    /// Pixel ceilings per platform class.
    pub budget: BudgetConfig,

    /// Scale-ladder retry settings.
    pub ladder: LadderConfig,

    /// Size estimator timing.
    pub estimator: EstimatorConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Encode quality presets offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
    Max,
}

impl QualityPreset {
    /// All presets, lowest quality first.
    pub const ALL: [QualityPreset; 4] = [Self::Low, Self::Medium, Self::High, Self::Max];

    /// Encoder quality in `(0, 1]`.
    pub fn quality(self) -> f32 {
        match self {
            Self::Low => 0.6,
            Self::Medium => 0.8,
            Self::High => 0.92,
            Self::Max => 1.0,
        }
    }

    /// Parse a preset name as given on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "max" => Some(Self::Max),
            _ => None,
        }
    }
}

/// Default export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Product name used as the export file name prefix.
    pub product: String,

    /// Default encode quality.
    pub quality: QualityPreset,

    /// Photos wider than this are downscaled when decoded.
    pub max_import_width: u32,
}

/// Maximum total raster pixels per platform class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Touch devices with historically strict rasterizer limits.
    pub constrained_pixels: u64,

    /// Other mobile devices.
    pub mobile_pixels: u64,

    /// Desktop.
    pub desktop_pixels: u64,
}

/// Scale-ladder retry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    /// Multipliers applied to the safe scale, in attempt order.
    pub safe_scale_factors: Vec<f64>,

    /// Absolute scale appended as the last resort.
    pub floor_scale: f64,

    /// Candidates at or below this scale are dropped.
    pub min_scale: f64,

    /// Delay after resizing before rasterizing (milliseconds).
    pub stabilize_ms: u64,

    /// Delay after a failed attempt (milliseconds).
    pub cooldown_ms: u64,
}

/// Size estimator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Debounce interval before sampling (milliseconds).
    pub debounce_ms: u64,

    /// Scale the interactive preview surface is rendered at.
    pub preview_scale: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "mosaic=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs_default_exports(),
            export: ExportDefaults::default(),
            budget: BudgetConfig::default(),
            ladder: LadderConfig::default(),
            estimator: EstimatorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            product: "mosaic".to_string(),
            quality: QualityPreset::default(),
            max_import_width: 2048,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            constrained_pixels: 16_777_216,
            mobile_pixels: 33_554_432,
            desktop_pixels: 268_435_456,
        }
    }
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            safe_scale_factors: vec![1.0, 0.7, 0.5],
            floor_scale: 0.25,
            min_scale: 0.1,
            stabilize_ms: 50,
            cooldown_ms: 250,
        }
    }
}

impl LadderConfig {
    pub fn stabilize_delay(&self) -> Duration {
        Duration::from_millis(self.stabilize_ms)
    }

    pub fn cooldown_delay(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            preview_scale: 0.25,
        }
    }
}

impl EstimatorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("mosaic").join("config.json")
}

/// Default exports directory.
fn dirs_default_exports() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("mosaic").join("exports")
}
