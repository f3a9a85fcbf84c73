//! Scene configuration with layered loading
//!
//! Native builds load from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `trophy.ron` file (if exists)
//! 3. Environment variables prefixed with `TROPHY_`
//!
//! Example environment variable: `TROPHY_SEQUENCER__FADE_DURATION=0.5`
//!
//! In the browser the RON text is handed over from JS instead.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use trophy_camera::{CameraRig, SequencerConfig};

/// Main scene configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SceneConfig {
    #[serde(default)]
    pub sequencer: SequencerConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub assets: AssetConfig,

    #[serde(default)]
    pub depth_of_field: DepthOfFieldConfig,
}

/// Initial camera before the first motion takes over
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Start position `[x, y, z]`
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            position: [200.0, 50.0, 50.0],
        }
    }
}

impl CameraConfig {
    pub fn rig(&self) -> CameraRig {
        CameraRig::new(glam::Vec3::from_array(self.position), self.fov_degrees)
    }
}

/// Asset locations and placement, consumed by the JS loader
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Trophy model (GLTF/GLB)
    pub model: String,
    /// HDR environment map, also used as background
    pub environment_map: String,
    /// Uniform model scale
    pub model_scale: f32,
    /// Model rotation around Y in radians
    pub model_rotation_y: f32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            model: "/trophy.gltf".to_string(),
            environment_map: "/ballroom_1k.hdr".to_string(),
            model_scale: 1.0,
            model_rotation_y: std::f32::consts::FRAC_PI_4,
        }
    }
}

/// Depth-of-field post-processing parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepthOfFieldConfig {
    pub focus_distance: f32,
    pub focal_length: f32,
    pub bokeh_scale: f32,
}

impl Default for DepthOfFieldConfig {
    fn default() -> Self {
        Self {
            focus_distance: 0.03,
            focal_length: 0.1,
            bokeh_scale: 5.0,
        }
    }
}

impl SceneConfig {
    /// Parse a full or partial configuration from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).context("Failed to parse scene configuration")
    }

    /// Load configuration from `trophy.ron` in the working directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        Self::load_from(std::path::Path::new("trophy.ron"))
    }

    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path` (if exists)
    /// 3. Environment variables prefixed with `TROPHY_` (highest priority)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        use config::{Config, Environment, File, FileFormat};

        let builder = Config::builder()
            // Layer 1: defaults come from the serde defaults above
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(File::from(path).format(FileFormat::Ron).required(false))
            // Layer 3: Environment variables (TROPHY_SEQUENCER__SEED, etc.)
            .add_source(
                Environment::with_prefix("TROPHY")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = builder.build().context("Failed to build configuration")?;

        let loaded: SceneConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        log::info!("Scene configuration loaded (file: {})", path.display());
        Ok(loaded)
    }
}
