// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{SceneConfig, SpinConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "storm-scene")]
#[command(about = "Rain and earthquake scene", long_about = None)]
pub struct Cli {
    /// JSON scene configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory texture paths are resolved against
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    /// Seed for rain placement and camera shake
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of rain drops
    #[arg(long = "rain-count")]
    pub rain_count: Option<usize>,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Spin the sphere twice as fast around y
    #[arg(long = "faithful-spin", default_value = "false")]
    pub faithful_spin: bool,

    /// Disable UI elements
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long = "dump-config", default_value = "false")]
    pub dump_config: bool,
}

impl Cli {
    /// Load the configured file (or the defaults) and apply the flag overrides
    pub fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&self, config: &mut SceneConfig) {
        if let Some(count) = self.rain_count {
            config.rain.count = count;
        }
        if self.faithful_spin {
            config.spin = SpinConfig::faithful();
        }
        config.assets = config.assets.rooted_at(&self.assets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["storm-scene"]);
        let config = cli.scene_config().unwrap();

        assert_eq!(config.rain, SceneConfig::default().rain);
        assert_eq!(config.spin, SpinConfig::default());
        assert!(!cli.no_ui);
        assert_eq!(cli.frames, None);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "storm-scene",
            "--rain-count",
            "250",
            "--faithful-spin",
            "--assets",
            "/data/storm",
            "--seed",
            "7",
        ]);
        let config = cli.scene_config().unwrap();

        assert_eq!(config.rain.count, 250);
        assert_eq!(config.spin.sphere, [0.01, 0.02, 0.01]);
        assert_eq!(config.assets.sky, PathBuf::from("/data/storm/textures/langit.jpg"));
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["storm-scene", "--config", "no/such/scene.json"]);
        assert!(cli.scene_config().is_err());
    }
}
