pub mod animator;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod frame;
pub mod geometry;
pub mod hud;
pub mod math;
pub mod quake;
pub mod rain;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod traits;
pub mod types;
pub mod window;
pub mod world;

pub use animator::{Animator, FrameUpdater};
pub use config::SceneConfig;
pub use world::World;
