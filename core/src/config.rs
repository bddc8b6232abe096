//! Renderer configuration (`renderer.toml`)
//!
//! All fields have defaults matching the classic 320x240 setup, so an empty
//! file (or no file) is a valid configuration.

use std::path::Path;

use psxrender_shared::FixedPoint;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::Color;

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RendererConfig {
    /// Screen size and clear color
    #[serde(default)]
    pub screen: ScreenConfig,
    /// Projection settings
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Depth-cue fog
    #[serde(default)]
    pub fog: FogConfig,
    /// Whole-object culling
    #[serde(default)]
    pub culling: CullingConfig,
    /// Near-camera quad subdivision
    #[serde(default)]
    pub subdivision: SubdivisionConfig,
    /// Primitive memory
    #[serde(default)]
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Width in pixels (default: 320)
    #[serde(default = "default_width")]
    pub width: u16,
    /// Height in pixels (default: 240)
    #[serde(default = "default_height")]
    pub height: u16,
    /// Clear color as `[r, g, b]` (default: black)
    #[serde(default)]
    pub clear_color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Projection plane distance `H` (default: 250)
    #[serde(default = "default_projection_distance")]
    pub distance: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FogConfig {
    /// Depth-cue vertex colors toward the far color (default: false)
    #[serde(default)]
    pub enabled: bool,
    /// Distance where fog starts (default: 2.0)
    #[serde(default = "default_fog_near")]
    pub near: f32,
    /// Distance where fog is opaque (default: 6.0)
    #[serde(default = "default_fog_far")]
    pub far: f32,
    /// Fog color as `[r, g, b]` (default: black)
    #[serde(default)]
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CullingConfig {
    /// Objects whose squared distance to the camera exceeds this are skipped
    /// (default: 6.0)
    #[serde(default = "default_cull_distance_sq")]
    pub max_distance_squared: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdivisionConfig {
    /// Subdivide textured quads of meshes flagged for it (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Quads with OTZ below this are split 2x2 (default: 3000)
    #[serde(default = "default_level1_distance")]
    pub level1_distance: u16,
    /// Quads with OTZ below this are split 4x4 (default: 1500)
    #[serde(default = "default_level2_distance")]
    pub level2_distance: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Bytes of primitive memory per parity (default: 262144)
    #[serde(default = "default_primitive_buffer_bytes")]
    pub primitive_buffer_bytes: usize,
}

fn default_width() -> u16 {
    320
}

fn default_height() -> u16 {
    240
}

fn default_projection_distance() -> u16 {
    250
}

fn default_fog_near() -> f32 {
    2.0
}

fn default_fog_far() -> f32 {
    6.0
}

fn default_cull_distance_sq() -> f32 {
    6.0
}

fn default_true() -> bool {
    true
}

fn default_level1_distance() -> u16 {
    3000
}

fn default_level2_distance() -> u16 {
    1500
}

fn default_primitive_buffer_bytes() -> usize {
    32768 * 8
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            clear_color: [0, 0, 0],
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            distance: default_projection_distance(),
        }
    }
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            near: default_fog_near(),
            far: default_fog_far(),
            color: [0, 0, 0],
        }
    }
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            max_distance_squared: default_cull_distance_sq(),
        }
    }
}

impl Default for SubdivisionConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level1_distance: default_level1_distance(),
            level2_distance: default_level2_distance(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            primitive_buffer_bytes: default_primitive_buffer_bytes(),
        }
    }
}

impl RendererConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "screen size {}x{} must be non-zero",
                self.screen.width, self.screen.height
            )));
        }
        if self.projection.distance == 0 {
            return Err(ConfigError::Invalid("projection distance must be non-zero".into()));
        }
        if self.fog.far <= self.fog.near {
            return Err(ConfigError::Invalid(format!(
                "fog far ({}) must be greater than fog near ({})",
                self.fog.far, self.fog.near
            )));
        }
        if self.subdivision.level2_distance > self.subdivision.level1_distance {
            return Err(ConfigError::Invalid(format!(
                "subdivision level2_distance ({}) must not exceed level1_distance ({})",
                self.subdivision.level2_distance, self.subdivision.level1_distance
            )));
        }
        if self.memory.primitive_buffer_bytes == 0 {
            return Err(ConfigError::Invalid("primitive buffer must be non-empty".into()));
        }
        Ok(())
    }

    pub fn fog_near(&self) -> FixedPoint {
        FixedPoint::from_f32(self.fog.near)
    }

    pub fn fog_far(&self) -> FixedPoint {
        FixedPoint::from_f32(self.fog.far)
    }

    pub fn fog_color(&self) -> Color {
        let [r, g, b] = self.fog.color;
        Color::rgb(r, g, b)
    }

    pub fn clear_color(&self) -> Color {
        let [r, g, b] = self.screen.clear_color;
        Color::rgb(r, g, b)
    }

    pub fn cull_distance_squared(&self) -> FixedPoint {
        FixedPoint::from_f32(self.culling.max_distance_squared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RendererConfig::default();
        assert_eq!(config.screen.width, 320);
        assert_eq!(config.screen.height, 240);
        assert_eq!(config.projection.distance, 250);
        assert!(!config.fog.enabled);
        assert_eq!(config.subdivision.level1_distance, 3000);
        assert_eq!(config.subdivision.level2_distance, 1500);
        assert_eq!(config.memory.primitive_buffer_bytes, 262_144);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config = RendererConfig::from_toml_str("").unwrap();
        assert_eq!(config, RendererConfig::default());
    }

    #[test]
    fn test_config_partial_section() {
        let config = RendererConfig::from_toml_str(
            r#"
            [fog]
            enabled = true
            color = [40, 60, 90]

            [projection]
            distance = 300
            "#,
        )
        .unwrap();
        assert!(config.fog.enabled);
        assert_eq!(config.fog.near, 2.0);
        assert_eq!(config.fog_color(), Color::rgb(40, 60, 90));
        assert_eq!(config.projection.distance, 300);
        assert_eq!(config.screen.width, 320);
    }

    #[test]
    fn test_config_rejects_inverted_fog() {
        let err = RendererConfig::from_toml_str("[fog]\nnear = 5.0\nfar = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        let err = RendererConfig::from_toml_str("[screen\nwidth = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let mut config = RendererConfig::default();
        config.culling.max_distance_squared = 64.0;
        config.subdivision.enabled = false;
        let text = config.to_toml_string().unwrap();
        assert_eq!(RendererConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renderer.toml");
        std::fs::write(&path, "[screen]\nwidth = 256\n").unwrap();
        let config = RendererConfig::load(&path).unwrap();
        assert_eq!(config.screen.width, 256);

        let missing = RendererConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn test_fixed_point_accessors() {
        let config = RendererConfig::default();
        assert_eq!(config.fog_near(), FixedPoint::from_int(2));
        assert_eq!(config.fog_far(), FixedPoint::from_int(6));
        assert_eq!(config.cull_distance_squared(), FixedPoint::from_int(6));
    }
}
