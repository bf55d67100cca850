use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Full scene configuration. `Default` is the reference scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub cube: CubeConfig,
    pub sphere: SphereConfig,
    pub ground: GroundConfig,
    pub lights: LightsConfig,
    pub fog: FogConfig,
    pub rain: RainConfig,
    pub quake: QuakeConfig,
    pub spin: SpinConfig,
    pub assets: AssetPaths,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            cube: CubeConfig::default(),
            sphere: SphereConfig::default(),
            ground: GroundConfig::default(),
            lights: LightsConfig::default(),
            fog: FogConfig::default(),
            rain: RainConfig::default(),
            quake: QuakeConfig::default(),
            spin: SpinConfig::default(),
            assets: AssetPaths::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 55.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 8.0, 30.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub size: f32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self { size: 4.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            width_segments: 32,
            height_segments: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub width: f32,
    pub height: f32,
    /// Texture repeat count on both axes
    pub repeat: [f32; 2],
    pub visible: bool,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            width: 256.0,
            height: 128.0,
            repeat: [16.0, 16.0],
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub directional_color: u32,
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub hemisphere_sky: u32,
    pub hemisphere_ground: u32,
    pub hemisphere_intensity: f32,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            directional_color: 0xffffff,
            directional_intensity: 0.7,
            directional_position: [0.0, 30.0, 30.0],
            ambient_color: 0xffffff,
            ambient_intensity: 0.5,
            hemisphere_sky: 0xffffbb,
            hemisphere_ground: 0x080820,
            hemisphere_intensity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub color: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: 0x808080,
            near: 1.0,
            far: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub count: usize,
    /// Side length of the square the drops are scattered over
    pub spread: f32,
    pub ceiling: f32,
    pub fall_speed: f32,
    pub color: u32,
    pub opacity: f32,
    /// Billboard size in world units
    pub point_size: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            spread: 100.0,
            ceiling: 50.0,
            fall_speed: 0.2,
            color: 0xaaaaaa,
            opacity: 1.0,
            point_size: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuakeConfig {
    /// Full width of the per-axis jitter range
    pub magnitude: f32,
    /// Frames of shaking right after startup
    pub initial_frames: u32,
    /// Frames of shaking per timer trigger
    pub burst_frames: u32,
    pub interval_secs: f32,
}

/// Longest accepted trigger period, about 136 years
const MAX_QUAKE_INTERVAL_SECS: f32 = u32::MAX as f32;

impl QuakeConfig {
    /// Trigger period as a `Duration`, rejecting values a timer cannot hold
    pub fn interval(&self) -> Result<Duration> {
        let secs = self.interval_secs;
        if !(secs > 0.0 && secs <= MAX_QUAKE_INTERVAL_SECS) {
            bail!("quake.interval_secs out of range: {}", secs);
        }
        Duration::try_from_secs_f32(secs)
            .with_context(|| format!("quake.interval_secs not representable: {}", secs))
    }
}

impl Default for QuakeConfig {
    fn default() -> Self {
        Self {
            magnitude: 0.09,
            initial_frames: 5,
            burst_frames: 100,
            interval_secs: 5.0,
        }
    }
}

/// Per-frame rotation increments in radians
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub cube: [f32; 3],
    pub sphere: [f32; 3],
}

impl SpinConfig {
    /// Sphere spins twice as fast around y, as the first version of the scene did
    pub fn faithful() -> Self {
        Self {
            sphere: [0.01, 0.02, 0.01],
            ..Self::default()
        }
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            cube: [0.01, 0.01, 0.01],
            sphere: [0.01, 0.01, 0.01],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub sky: PathBuf,
    pub cube: PathBuf,
    pub sphere: PathBuf,
    pub ground_color: PathBuf,
    pub ground_normal: PathBuf,
}

impl AssetPaths {
    /// Resolve every relative path against `root`
    pub fn rooted_at(&self, root: &Path) -> Self {
        let join = |p: &PathBuf| if p.is_absolute() { p.clone() } else { root.join(p) };
        Self {
            sky: join(&self.sky),
            cube: join(&self.cube),
            sphere: join(&self.sphere),
            ground_color: join(&self.ground_color),
            ground_normal: join(&self.ground_normal),
        }
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            sky: PathBuf::from("textures/langit.jpg"),
            cube: PathBuf::from("textures/batu.jpg"),
            sphere: PathBuf::from("textures/peta.jpg"),
            ground_color: PathBuf::from("textures/rumput.jpg"),
            ground_normal: PathBuf::from("textures/rumput.png"),
        }
    }
}

impl SceneConfig {
    /// Load a JSON config file; missing fields fall back to the reference values
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize config")
    }

    pub fn validate(&self) -> Result<()> {
        if self.rain.ceiling <= 0.0 {
            bail!("rain.ceiling must be positive, got {}", self.rain.ceiling);
        }
        if self.rain.fall_speed <= 0.0 {
            bail!("rain.fall_speed must be positive, got {}", self.rain.fall_speed);
        }
        if self.camera.fov_degrees <= 0.0 || self.camera.fov_degrees >= 180.0 {
            bail!("camera.fov_degrees out of range: {}", self.camera.fov_degrees);
        }
        if self.camera.near <= 0.0 || self.camera.near >= self.camera.far {
            bail!(
                "camera planes invalid: near {} far {}",
                self.camera.near,
                self.camera.far
            );
        }
        self.quake.interval()?;
        if self.sphere.width_segments < 3 || self.sphere.height_segments < 2 {
            bail!("sphere needs at least 3x2 segments");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_reference_values() {
        let config: SceneConfig =
            serde_json::from_str(r#"{ "rain": { "count": 12 }, "quake": { "magnitude": 0.5 } }"#)
                .unwrap();

        assert_eq!(config.rain.count, 12);
        assert_eq!(config.rain.ceiling, 50.0);
        assert_eq!(config.quake.magnitude, 0.5);
        assert_eq!(config.quake.burst_frames, 100);
        assert_eq!(config.camera.position, [0.0, 8.0, 30.0]);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = SceneConfig::default();
        let parsed: SceneConfig = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_non_positive_ceiling() {
        let mut config = SceneConfig::default();
        config.rain.ceiling = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_quake_interval() {
        let mut config = SceneConfig::default();
        config.quake.interval_secs = 1e30;
        assert!(config.validate().is_err());

        config.quake.interval_secs = f32::NAN;
        assert!(config.validate().is_err());

        config.quake.interval_secs = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn quake_interval_converts_to_duration() {
        let quake = QuakeConfig::default();
        assert_eq!(quake.interval().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn rejects_inverted_camera_planes() {
        let mut config = SceneConfig::default();
        config.camera.near = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn faithful_spin_doubles_sphere_y() {
        let spin = SpinConfig::faithful();
        assert_eq!(spin.sphere, [0.01, 0.02, 0.01]);
        assert_eq!(spin.cube, [0.01, 0.01, 0.01]);
    }

    #[test]
    fn assets_resolve_against_root() {
        let assets = AssetPaths::default().rooted_at(Path::new("/data"));
        assert_eq!(assets.cube, PathBuf::from("/data/textures/batu.jpg"));
    }
}
