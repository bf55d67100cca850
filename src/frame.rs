use std::time::Instant;

/// Timing of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the clock started
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// What the host loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Request another redraw
    NextFrame,
    /// Stop redrawing and tear down
    Stop,
}

/// Numbers frames and measures their timing. Also an infinite iterator
/// stamped with `Instant::now()`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            frame_number: 0,
            start_time: start,
            last_frame_time: start,
        }
    }

    /// Stamp the next frame at `now`
    pub fn next_at(&mut self, now: Instant) -> FrameInfo {
        let delta = now.saturating_duration_since(self.last_frame_time).as_secs_f32();
        let time = now.saturating_duration_since(self.start_time).as_secs_f32();
        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_frame_time = now;

        info
    }

    /// Frames handed out so far
    pub fn frame_count(&self) -> u64 {
        self.frame_number
    }

    pub fn elapsed(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameClock {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        Some(self.next_at(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn frames_are_numbered_with_deltas() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let first = clock.next_at(start + Duration::from_millis(16));
        let second = clock.next_at(start + Duration::from_millis(40));

        assert_eq!(first.number, 0);
        assert_eq!(second.number, 1);
        assert!((first.delta - 0.016).abs() < 1e-4);
        assert!((second.delta - 0.024).abs() < 1e-4);
        assert!((second.time - 0.040).abs() < 1e-4);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn iterator_never_ends() {
        let clock = FrameClock::new();
        assert_eq!(clock.take(3).count(), 3);
    }
}
