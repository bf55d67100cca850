use glam::Vec3;
use rand::Rng;

use crate::config::QuakeConfig;

/// Camera-shake counter.
///
/// While `remaining_frames > 0` each frame jitters the camera by up to
/// `magnitude / 2` per axis and counts down. It never re-arms on its own;
/// only `trigger` refills it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quake {
    magnitude: f32,
    burst_frames: u32,
    remaining_frames: u32,
}

impl Quake {
    pub fn new(magnitude: f32, burst_frames: u32, remaining_frames: u32) -> Self {
        Self {
            magnitude,
            burst_frames,
            remaining_frames,
        }
    }

    pub fn from_config(config: &QuakeConfig) -> Self {
        Self::new(config.magnitude, config.burst_frames, config.initial_frames)
    }

    /// Refill the counter to the burst length, whatever it was before
    pub fn trigger(&mut self) {
        self.remaining_frames = self.burst_frames;
    }

    /// Jitter `position` if shaking, returns whether it moved
    pub fn shake<R: Rng + ?Sized>(&mut self, position: &mut Vec3, rng: &mut R) -> bool {
        if self.remaining_frames == 0 {
            return false;
        }

        let offset = Vec3::new(
            (rng.gen::<f32>() - 0.5) * self.magnitude,
            (rng.gen::<f32>() - 0.5) * self.magnitude,
            (rng.gen::<f32>() - 0.5) * self.magnitude,
        );
        *position += offset;
        self.remaining_frames -= 1;

        true
    }

    pub fn remaining_frames(&self) -> u32 {
        self.remaining_frames
    }

    pub fn set_remaining_frames(&mut self, frames: u32) {
        self.remaining_frames = frames;
    }

    pub fn burst_frames(&self) -> u32 {
        self.burst_frames
    }

    pub fn is_active(&self) -> bool {
        self.remaining_frames > 0
    }
}
