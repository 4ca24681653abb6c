// src/config.rs

use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Point2, Polygon};
use crate::subdivision::{vertex_count_after, Bulge};

pub const DEFAULT_MAX_ITERATIONS: usize = 12;
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Largest stage a cycle may reach. Holds the reference triangle at the
/// default 12 iterations (3·4^11 vertices) and keeps the desktop vertex
/// buffer under wgpu's default `max_buffer_size`.
pub const MAX_STAGE_VERTICES: usize = 1 << 24;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Koch Snowflake".to_string(),
        }
    }
}

/// RGBA colors in 0..=1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub line_color: [f32; 4],
    pub clear_color: [f32; 4],
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            line_color: [0.0, 0.0, 0.0, 1.0],
            clear_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Settings loaded from TOML; every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SnowflakeConfig {
    pub max_iterations: usize,
    pub interval_ms: u64,
    /// Seed vertices as `[x, y]` pairs; the reference triangle when absent.
    pub seed: Option<Vec<[f64; 2]>>,
    pub bulge: Bulge,
    pub log_level: Option<LogLevel>,
    pub window: WindowConfig,
    pub style: StyleConfig,
}

impl Default for SnowflakeConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            interval_ms: DEFAULT_INTERVAL_MS,
            seed: None,
            bulge: Bulge::Outward,
            log_level: None,
            window: WindowConfig::default(),
            style: StyleConfig::default(),
        }
    }
}

/// Everything the animation loop needs, already checked.
#[derive(Debug, Clone)]
pub struct AnimationSettings {
    pub seed: Polygon,
    pub max_iterations: usize,
    pub bulge: Bulge,
    pub interval: Duration,
}

impl SnowflakeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn seed_polygon(&self) -> Result<Polygon> {
        match &self.seed {
            Some(points) => Polygon::new(points.iter().copied().map(Point2::from).collect()),
            None => Ok(Polygon::reference_seed()),
        }
    }

    pub fn validate(&self) -> Result<AnimationSettings> {
        if self.max_iterations < 1 {
            return Err(Error::Configuration(format!(
                "max_iterations must be at least 1, got {}",
                self.max_iterations
            )));
        }
        if self.interval_ms == 0 {
            return Err(Error::Configuration(
                "interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Configuration(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        let seed = self.seed_polygon()?;
        let last_stage = u32::try_from(self.max_iterations - 1)
            .ok()
            .and_then(|steps| vertex_count_after(seed.len(), steps));
        match last_stage {
            Some(count) if count <= MAX_STAGE_VERTICES => {}
            Some(count) => {
                return Err(Error::Configuration(format!(
                    "{} iterations of a {}-vertex seed reach {} vertices, above the limit of {}",
                    self.max_iterations,
                    seed.len(),
                    count,
                    MAX_STAGE_VERTICES
                )));
            }
            None => {
                return Err(Error::Configuration(format!(
                    "{} iterations of a {}-vertex seed overflow the vertex count",
                    self.max_iterations,
                    seed.len()
                )));
            }
        }
        debug!(
            "Validated config: {} iterations, {} seed vertices, {:?}",
            self.max_iterations,
            seed.len(),
            self.bulge
        );
        Ok(AnimationSettings {
            seed,
            max_iterations: self.max_iterations,
            bulge: self.bulge,
            interval: Duration::from_millis(self.interval_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = SnowflakeConfig::from_toml("").unwrap();
        assert_eq!(config, SnowflakeConfig::default());
        let settings = config.validate().unwrap();
        assert_eq!(settings.max_iterations, 12);
        assert_eq!(settings.interval, Duration::from_millis(500));
        assert_eq!(settings.seed, Polygon::reference_seed());
    }

    #[test]
    fn parses_seed_and_nested_tables() {
        let config = SnowflakeConfig::from_toml(
            r#"
            max_iterations = 5
            bulge = "inward"
            seed = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]

            [window]
            title = "Square"

            [style]
            line_color = [0.2, 0.4, 0.8, 1.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.bulge, Bulge::Inward);
        assert_eq!(config.window.title, "Square");
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.style.clear_color, [1.0, 1.0, 1.0, 1.0]);
        let settings = config.validate().unwrap();
        assert_eq!(settings.seed.len(), 4);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(SnowflakeConfig::from_toml("iterations = 3").is_err());
    }

    #[test]
    fn zero_iterations_is_a_configuration_error() {
        let config = SnowflakeConfig {
            max_iterations: 0,
            ..SnowflakeConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn zero_interval_is_a_configuration_error() {
        let config = SnowflakeConfig {
            interval_ms: 0,
            ..SnowflakeConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn overflowing_iteration_count_is_rejected() {
        let config = SnowflakeConfig {
            max_iterations: 40,
            ..SnowflakeConfig::default()
        };
        assert_eq!(vertex_count_after(3, 39), None);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn stage_above_vertex_ceiling_is_rejected() {
        let seed: Vec<[f64; 2]> = (0..1000)
            .map(|i| {
                let angle = i as f64 / 1000.0 * std::f64::consts::TAU;
                [angle.cos(), angle.sin()]
            })
            .collect();
        let config = SnowflakeConfig {
            seed: Some(seed),
            ..SnowflakeConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("above the limit"));
    }

    #[test]
    fn largest_stage_at_the_ceiling_is_accepted() {
        // A square seed at 12 iterations ends on exactly 4·4^11 = 2^24 vertices.
        let config = SnowflakeConfig {
            seed: Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            ..SnowflakeConfig::default()
        };
        assert!(config.validate().is_ok());
        let config = SnowflakeConfig {
            seed: config.seed,
            max_iterations: 13,
            ..SnowflakeConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn short_seed_is_an_invalid_polygon() {
        let config = SnowflakeConfig {
            seed: Some(vec![[0.0, 0.0], [1.0, 1.0]]),
            ..SnowflakeConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidPolygon(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SnowflakeConfig::load(Path::new("/nonexistent/snowflake.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
        assert!(err.to_string().contains("/nonexistent/snowflake.toml"));
    }
}
