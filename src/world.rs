use rand::Rng;

use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::quake::Quake;
use crate::rain::RainField;
use crate::scene::Scene;

/// Initial aspect ratio until the first frame reads the real display size
pub const DEFAULT_ASPECT: f32 = 4.0 / 3.0;

/// All mutable state of a running scene.
///
/// Single owner on the event-loop thread. Both the frame update and the quake
/// trigger reach the shake counter through `&mut World`.
#[derive(Debug, Clone)]
pub struct World {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub rain: RainField,
    pub quake: Quake,
}

impl World {
    pub fn setup<R: Rng + ?Sized>(config: &SceneConfig, aspect: f32, rng: &mut R) -> Self {
        let scene = Scene::build(config);
        let camera = PerspectiveCamera::from_config(&config.camera, aspect);
        let rain = RainField::scatter(&config.rain, rng);
        let quake = Quake::from_config(&config.quake);

        log::info!(
            "Scene ready: {} rain drops, {} sphere triangles, quake every {:.1}s",
            rain.len(),
            scene.sphere.mesh.triangle_count(),
            config.quake.interval_secs
        );

        Self {
            scene,
            camera,
            rain,
            quake,
        }
    }
}
