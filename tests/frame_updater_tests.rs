use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use anyhow::Result;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use storm_scene::config::{SceneConfig, SpinConfig};
use storm_scene::frame::{FrameInfo, Schedule};
use storm_scene::traits::{PixelSize, SceneRenderer};
use storm_scene::world::{World, DEFAULT_ASPECT};
use storm_scene::{Animator, FrameUpdater};

/// Records what the updater asked of it instead of drawing
#[derive(Default)]
struct RecordingRenderer {
    size: PixelSize,
    resizes: Vec<PixelSize>,
    frames: Vec<u64>,
    camera_positions: Vec<Vec3>,
}

impl SceneRenderer for RecordingRenderer {
    fn buffer_size(&self) -> PixelSize {
        self.size
    }

    fn resize(&mut self, size: PixelSize) {
        self.size = size;
        self.resizes.push(size);
    }

    fn render(&mut self, world: &World, frame: &FrameInfo) -> Result<()> {
        self.frames.push(frame.number);
        self.camera_positions.push(world.camera.position);
        Ok(())
    }
}

fn small_config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.rain.count = 200;
    config
}

fn world_with_seed(config: &SceneConfig, seed: u64) -> World {
    let mut rng = StdRng::seed_from_u64(seed);
    World::setup(config, DEFAULT_ASPECT, &mut rng)
}

#[cfg(test)]
mod frame_updater {
    use super::*;

    #[test]
    fn test_camera_still_without_quake_then_shakes_once() {
        let config = small_config();
        let mut world = world_with_seed(&config, 1);
        world.quake.set_remaining_frames(0);
        let mut updater = FrameUpdater::new(&config.spin, StdRng::seed_from_u64(2));
        let start = world.camera.position;

        for _ in 0..50 {
            updater.advance(&mut world);
        }
        assert_eq!(world.camera.position, start, "Camera should not move without a quake");

        world.quake.set_remaining_frames(100);
        updater.advance(&mut world);

        let moved = world.camera.position - start;
        for axis in moved.to_array() {
            assert!(axis.abs() <= 0.045 + 1e-5, "Shake offset {} exceeds half the magnitude", axis);
        }
        assert_eq!(world.quake.remaining_frames(), 99);
    }

    #[test]
    fn test_cube_rotation_is_frame_count_times_increment() {
        let config = small_config();
        let mut world = world_with_seed(&config, 3);
        let mut updater = FrameUpdater::new(&config.spin, StdRng::seed_from_u64(4));

        let frames = 700;
        for _ in 0..frames {
            updater.advance(&mut world);
        }

        let expected = (frames as f32 * 0.01).rem_euclid(TAU);
        let rotation = world.scene.cube.transform.rotation;
        for axis in rotation.to_array() {
            assert!((axis - expected).abs() < 1e-3, "Expected {}, got {}", expected, axis);
        }
    }

    #[test]
    fn test_faithful_spin_doubles_sphere_y() {
        let mut config = small_config();
        config.spin = SpinConfig::faithful();
        let mut world = world_with_seed(&config, 5);
        let mut updater = FrameUpdater::new(&config.spin, StdRng::seed_from_u64(6));

        for _ in 0..10 {
            updater.advance(&mut world);
        }

        let rotation = world.scene.sphere.transform.rotation;
        assert!((rotation.x - 0.1).abs() < 1e-5);
        assert!((rotation.y - 0.2).abs() < 1e-5);
        assert!((rotation.z - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_resize_happens_once_per_size_change() {
        let config = small_config();
        let mut world = world_with_seed(&config, 7);
        let mut updater = FrameUpdater::new(&config.spin, StdRng::seed_from_u64(8));
        let mut renderer = RecordingRenderer::default();
        let display = PixelSize::new(1600, 900);

        for number in 0..3 {
            updater
                .update(&mut world, &display, &mut renderer, &FrameInfo::new(number, 0.0, 0.0))
                .unwrap();
        }

        assert_eq!(renderer.resizes, vec![display]);
        assert_eq!(renderer.frames, vec![0, 1, 2]);
        assert!((world.camera.aspect() - 16.0 / 9.0).abs() < 1e-5);

        let larger = PixelSize::new(1920, 1080);
        updater
            .update(&mut world, &larger, &mut renderer, &FrameInfo::new(3, 0.0, 0.0))
            .unwrap();
        assert_eq!(renderer.resizes, vec![display, larger]);
    }

    #[test]
    fn test_minimized_display_skips_resize() {
        let config = small_config();
        let mut world = world_with_seed(&config, 9);
        let updater = FrameUpdater::new(&config.spin, StdRng::seed_from_u64(10));
        let mut renderer = RecordingRenderer::default();
        let aspect = world.camera.aspect();

        let resized = updater.fit_to_display(&mut world, &PixelSize::new(0, 600), &mut renderer);

        assert!(!resized);
        assert!(renderer.resizes.is_empty());
        assert_eq!(world.camera.aspect(), aspect);
    }
}

#[cfg(test)]
mod animator {
    use super::*;

    #[test]
    fn test_frame_limit_stops_the_loop() {
        let config = small_config();
        let world = world_with_seed(&config, 11);
        let mut animator = Animator::new(world, &config, 12).unwrap().with_frame_limit(5);
        let mut renderer = RecordingRenderer::default();
        let display = PixelSize::new(800, 600);

        let ran = animator.run_frames(20, &display, &mut renderer).unwrap();

        assert_eq!(ran, 5);
        assert!(!animator.is_running());
        assert_eq!(renderer.frames, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_frame_limit_renders_nothing() {
        let config = small_config();
        let world = world_with_seed(&config, 17);
        let mut animator = Animator::new(world, &config, 18).unwrap().with_frame_limit(0);
        let mut renderer = RecordingRenderer::default();
        let before = animator.world().rain.positions().to_vec();

        let ran = animator.run_frames(10, &PixelSize::new(800, 600), &mut renderer).unwrap();

        assert_eq!(ran, 0);
        assert!(renderer.frames.is_empty());
        assert!(renderer.resizes.is_empty());
        assert!(!animator.is_running());
        assert_eq!(animator.world().rain.positions(), before.as_slice());
    }

    #[test]
    fn test_unrepresentable_quake_interval_is_an_error() {
        let mut config = small_config();
        let world = world_with_seed(&config, 19);
        config.quake.interval_secs = 1e30;

        assert!(Animator::new(world, &config, 20).is_err());
    }

    #[test]
    fn test_stopped_animator_leaves_world_untouched() {
        let config = small_config();
        let world = world_with_seed(&config, 13);
        let mut animator = Animator::new(world, &config, 14).unwrap();
        let mut renderer = RecordingRenderer::default();
        let display = PixelSize::new(800, 600);

        animator.stop();
        let before = animator.world().rain.positions().to_vec();
        let rotation = animator.world().scene.cube.transform.rotation;

        let schedule = animator.frame(&display, &mut renderer).unwrap();

        assert_eq!(schedule, Schedule::Stop);
        assert!(renderer.frames.is_empty());
        assert_eq!(animator.world().rain.positions(), before.as_slice());
        assert_eq!(animator.world().scene.cube.transform.rotation, rotation);
        assert!(!animator.poll_timers(Instant::now() + Duration::from_secs(60)));
    }

    #[test]
    fn test_running_animator_schedules_next_frame() {
        let config = small_config();
        let world = world_with_seed(&config, 15);
        let mut animator = Animator::new(world, &config, 16).unwrap();
        let mut renderer = RecordingRenderer::default();

        let schedule = animator.frame(&PixelSize::new(640, 480), &mut renderer).unwrap();

        assert_eq!(schedule, Schedule::NextFrame);
        assert_eq!(animator.frames_rendered(), 1);
        assert_eq!(renderer.resizes, vec![PixelSize::new(640, 480)]);
    }
}
