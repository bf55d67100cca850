use std::time::Instant;

use anyhow::Result;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{SceneConfig, SpinConfig};
use crate::core::timer::Interval;
use crate::frame::{FrameClock, FrameInfo, Schedule};
use crate::traits::{DisplaySurface, SceneRenderer};
use crate::world::World;

/// Per-frame state transition of the world.
///
/// Owns the random source for camera jitter and the spin rates; everything
/// else it touches arrives through `&mut World`.
#[derive(Debug, Clone)]
pub struct FrameUpdater {
    cube_spin: Vec3,
    sphere_spin: Vec3,
    rng: StdRng,
}

impl FrameUpdater {
    pub fn new(spin: &SpinConfig, rng: StdRng) -> Self {
        Self {
            cube_spin: Vec3::from_array(spin.cube),
            sphere_spin: Vec3::from_array(spin.sphere),
            rng,
        }
    }

    /// Match the render buffer to the display. Returns true if it resized.
    pub fn fit_to_display(
        &self,
        world: &mut World,
        surface: &dyn DisplaySurface,
        renderer: &mut dyn SceneRenderer,
    ) -> bool {
        let size = surface.pixel_size();
        if size.is_empty() || size == renderer.buffer_size() {
            return false;
        }

        log::debug!("Resizing render buffer to {}x{}", size.width, size.height);
        renderer.resize(size);
        world.camera.set_aspect(size.aspect());
        true
    }

    /// Everything a frame changes except drawing
    pub fn advance(&mut self, world: &mut World) {
        let World {
            camera,
            quake,
            rain,
            scene,
        } = world;

        quake.shake(&mut camera.position, &mut self.rng);
        rain.step();
        scene.cube.transform.rotate(self.cube_spin);
        scene.sphere.transform.rotate(self.sphere_spin);
    }

    /// Resize, animate, then draw one frame
    pub fn update(
        &mut self,
        world: &mut World,
        surface: &dyn DisplaySurface,
        renderer: &mut dyn SceneRenderer,
        frame: &FrameInfo,
    ) -> Result<()> {
        self.fit_to_display(world, surface, renderer);
        self.advance(world);
        renderer.render(world, frame)
    }
}

/// Drives the world: frame updates, the quake trigger and the stop hook.
pub struct Animator {
    world: World,
    updater: FrameUpdater,
    quake_timer: Interval,
    clock: FrameClock,
    frame_limit: Option<u64>,
    running: bool,
}

impl Animator {
    pub fn new(world: World, config: &SceneConfig, seed: u64) -> Result<Self> {
        let now = Instant::now();
        let period = config.quake.interval()?;

        Ok(Self {
            world,
            updater: FrameUpdater::new(&config.spin, StdRng::seed_from_u64(seed)),
            quake_timer: Interval::starting_at(period, now),
            clock: FrameClock::starting_at(now),
            frame_limit: None,
            running: true,
        })
    }

    /// Stop on its own after `frames` frames
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Fire the quake trigger if its wall-clock period has elapsed
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        if !self.running || !self.quake_timer.poll(now) {
            return false;
        }

        self.world.quake.trigger();
        log::debug!(
            "Quake triggered: {} frames, next in {:?}",
            self.world.quake.remaining_frames(),
            self.quake_timer.period()
        );
        true
    }

    /// Run one frame stamped at `now`
    pub fn frame_at(
        &mut self,
        now: Instant,
        surface: &dyn DisplaySurface,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<Schedule> {
        self.stop_at_limit();
        if !self.running {
            return Ok(Schedule::Stop);
        }

        let frame = self.clock.next_at(now);
        let result = self
            .updater
            .update(&mut self.world, surface, renderer, &frame);

        self.stop_at_limit();
        result.map(|()| self.schedule())
    }

    pub fn frame(
        &mut self,
        surface: &dyn DisplaySurface,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<Schedule> {
        self.frame_at(Instant::now(), surface, renderer)
    }

    /// Headless driver: run up to `frames` frames, stopping early if stopped
    pub fn run_frames(
        &mut self,
        frames: u64,
        surface: &dyn DisplaySurface,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<u64> {
        let start = self.clock.frame_count();
        for _ in 0..frames {
            if self.frame(surface, renderer)? == Schedule::Stop {
                break;
            }
        }
        Ok(self.clock.frame_count() - start)
    }

    /// Teardown hook: no further frame mutates the world
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!(
                "Animation stopped after {} frames ({:.1}s)",
                self.clock.frame_count(),
                self.clock.elapsed()
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames_rendered(&self) -> u64 {
        self.clock.frame_count()
    }

    fn stop_at_limit(&mut self) {
        if let Some(limit) = self.frame_limit {
            if self.running && self.clock.frame_count() >= limit {
                log::info!("Frame limit of {} reached", limit);
                self.stop();
            }
        }
    }

    fn schedule(&self) -> Schedule {
        if self.running {
            Schedule::NextFrame
        } else {
            Schedule::Stop
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn quake_timer(&self) -> &Interval {
        &self.quake_timer
    }
}
