//! YAML configuration.
//!
//! Precedence: CLI > ENV > file > defaults. The binary applies CLI flags on
//! top of what [`Config::discover`] returns.

use crate::error::{Error, Result};
use crate::visual::MappingScales;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "tidebloom.yaml";

/// Environment variable overriding `data.rainfall_url`.
pub const ENV_RAINFALL_URL: &str = "TIDEBLOOM_RAINFALL_URL";
/// Environment variable overriding `data.rainfall_token`.
pub const ENV_RAINFALL_TOKEN: &str = "TIDEBLOOM_RAINFALL_TOKEN";
/// Environment variable overriding `data.iris_csv`.
pub const ENV_IRIS_CSV: &str = "TIDEBLOOM_IRIS_CSV";
/// Environment variable overriding `data.tide_csv`.
pub const ENV_TIDE_CSV: &str = "TIDEBLOOM_TIDE_CSV";

/// Settings shared by every sketch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Seed for synthetic data, stars, jitter and variants.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Frames rendered by a headless run when `--frames` is not given.
    #[serde(default = "default_frames")]
    pub frames: u64,

    /// Enable mouse support.
    #[serde(default = "default_mouse")]
    pub mouse: bool,
}

fn default_seed() -> u64 {
    42
}
fn default_frames() -> u64 {
    120
}
fn default_mouse() -> bool {
    true
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self { seed: default_seed(), frames: default_frames(), mouse: default_mouse() }
    }
}

/// Where the datasets come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Iris CSV path.
    #[serde(default = "default_iris_csv")]
    pub iris_csv: PathBuf,

    /// Tide CSV path; the built-in series is used when unset.
    #[serde(default)]
    pub tide_csv: Option<PathBuf>,

    /// Rainfall JSON endpoint; synthetic data is used when unset.
    #[serde(default)]
    pub rainfall_url: Option<String>,

    /// Bearer token sent with the rainfall request.
    #[serde(default)]
    pub rainfall_token: Option<String>,

    /// Rainfall request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_iris_csv() -> PathBuf {
    PathBuf::from("data/Iris.csv")
}
fn default_fetch_timeout() -> u64 {
    10
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            iris_csv: default_iris_csv(),
            tide_csv: None,
            rainfall_url: None,
            rainfall_token: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

/// Canvas size and pacing of one sketch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: f32,
}

impl CanvasConfig {
    /// Frame interval at the target rate.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }

    fn validate(&self, key: &'static str) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::ConfigInvalid { key, message: "canvas must be at least 1x1".to_string() });
        }
        if !(self.fps > 0.0 && self.fps <= 240.0) {
            return Err(Error::ConfigInvalid { key, message: format!("fps {} outside (0, 240]", self.fps) });
        }
        Ok(())
    }
}

/// Tidal spiral settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpiralConfig {
    /// Canvas and pacing.
    #[serde(default = "default_spiral_canvas")]
    pub canvas: CanvasConfig,
    /// Readings drawn per frame.
    #[serde(default = "default_spiral_window")]
    pub window: usize,
    /// Initial speed.
    #[serde(default = "default_one")]
    pub speed: u32,
    /// Initial stroke width.
    #[serde(default = "default_spiral_thickness")]
    pub thickness: u32,
    /// Background stars.
    #[serde(default = "default_spiral_stars")]
    pub stars: usize,
}

fn default_spiral_canvas() -> CanvasConfig {
    CanvasConfig { width: 800, height: 800, fps: 60.0 }
}
fn default_spiral_window() -> usize {
    400
}
fn default_one() -> u32 {
    1
}
fn default_spiral_thickness() -> u32 {
    2
}
fn default_spiral_stars() -> usize {
    30
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            canvas: default_spiral_canvas(),
            window: default_spiral_window(),
            speed: default_one(),
            thickness: default_spiral_thickness(),
            stars: default_spiral_stars(),
        }
    }
}

/// Iris flower settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowerConfig {
    /// Canvas and pacing.
    #[serde(default = "default_flower_canvas")]
    pub canvas: CanvasConfig,
    /// Initial effect intensity, within `[0.5, 2.0]`.
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    /// Initial zoom, within `[0.5, 3.2]`.
    #[serde(default = "default_zoom")]
    pub zoom: f32,
}

fn default_flower_canvas() -> CanvasConfig {
    CanvasConfig { width: 1000, height: 700, fps: 30.0 }
}
fn default_intensity() -> f32 {
    1.0
}
fn default_zoom() -> f32 {
    1.3
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self { canvas: default_flower_canvas(), intensity: default_intensity(), zoom: default_zoom() }
    }
}

/// Settings of the three GIF-style sketches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Canvas and pacing.
    pub canvas: CanvasConfig,
}

fn default_rainfall_map() -> ChartConfig {
    ChartConfig { canvas: CanvasConfig { width: 800, height: 480, fps: 1.25 } }
}
fn default_rainfall_chart() -> ChartConfig {
    ChartConfig { canvas: CanvasConfig { width: 1200, height: 560, fps: 10.0 } }
}
fn default_biovis() -> ChartConfig {
    ChartConfig { canvas: CanvasConfig { width: 800, height: 600, fps: 16.0 } }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global settings.
    #[serde(default)]
    pub global: GlobalConfig,

    /// Dataset sources.
    #[serde(default)]
    pub data: DataConfig,

    /// Record → visual scaling factors.
    #[serde(default)]
    pub mapping: MappingScales,

    /// Tidal spiral.
    #[serde(default)]
    pub spiral: SpiralConfig,

    /// Iris flowers.
    #[serde(default)]
    pub flower: FlowerConfig,

    /// Rainfall bubble map.
    #[serde(default = "default_rainfall_map")]
    pub rainfall_map: ChartConfig,

    /// Animated rainfall chart.
    #[serde(default = "default_rainfall_chart")]
    pub rainfall_chart: ChartConfig,

    /// Bio pulse animation.
    #[serde(default = "default_biovis")]
    pub biovis: ChartConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            global: GlobalConfig::default(),
            data: DataConfig::default(),
            mapping: MappingScales::default(),
            spiral: SpiralConfig::default(),
            flower: FlowerConfig::default(),
            rainfall_map: default_rainfall_map(),
            rainfall_chart: default_rainfall_chart(),
            biovis: default_biovis(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content =
            std::fs::read_to_string(path).map_err(|_| Error::ConfigNotFound(path.to_path_buf()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Candidate config files when no explicit path is given, in lookup order.
    #[must_use]
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("tidebloom/config.yaml"));
        }
        paths
    }

    /// Resolve the file layer, then apply environment overrides and validate.
    ///
    /// An explicit path must exist. Without one, the first existing file of
    /// [`search_paths`](Self::search_paths) is used, else the defaults.
    ///
    /// # Errors
    ///
    /// Fails on an unreadable explicit path, a malformed file, or invalid
    /// values.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!("loading config from {}", path.display());
                Self::load(path)?
            }
            None => match Self::search_paths().into_iter().find(|p| p.is_file()) {
                Some(path) => {
                    info!("loading config from {}", path.display());
                    Self::load(path)?
                }
                None => {
                    debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override file values from environment variables, looked up via `var`.
    /// Empty values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = var(ENV_RAINFALL_URL) {
            self.data.rainfall_url = Some(url);
        }
        if let Some(token) = var(ENV_RAINFALL_TOKEN) {
            self.data.rainfall_token = Some(token);
        }
        if let Some(path) = var(ENV_IRIS_CSV) {
            self.data.iris_csv = PathBuf::from(path);
        }
        if let Some(path) = var(ENV_TIDE_CSV) {
            self.data.tide_csv = Some(PathBuf::from(path));
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        self.spiral.canvas.validate("spiral.canvas")?;
        self.flower.canvas.validate("flower.canvas")?;
        self.rainfall_map.canvas.validate("rainfall_map.canvas")?;
        self.rainfall_chart.canvas.validate("rainfall_chart.canvas")?;
        self.biovis.canvas.validate("biovis.canvas")?;

        if self.spiral.window == 0 {
            return Err(Error::ConfigInvalid { key: "spiral.window", message: "must be at least 1".to_string() });
        }
        if !(0.5..=2.0).contains(&self.flower.intensity) {
            return Err(Error::ConfigInvalid {
                key: "flower.intensity",
                message: format!("{} outside 0.5..=2.0", self.flower.intensity),
            });
        }
        if !(0.5..=3.2).contains(&self.flower.zoom) {
            return Err(Error::ConfigInvalid {
                key: "flower.zoom",
                message: format!("{} outside 0.5..=3.2", self.flower.zoom),
            });
        }
        let m = &self.mapping;
        let factors = [m.petal_length, m.petal_width, m.bubble_area, m.min_size];
        if factors.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(Error::ConfigInvalid { key: "mapping", message: "scale factors must be positive".to_string() });
        }
        Ok(())
    }
}
