use std::time::{Duration, Instant};

/// Wall-clock periodic timer, independent of frame rate.
///
/// `poll` fires at most once per call; periods missed during a stall
/// coalesce into one fire and the schedule restarts from `now`.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: Duration,
    next_fire: Instant,
}

impl Interval {
    /// First fire one full period after `start`
    pub fn starting_at(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_fire: start + period,
        }
    }

    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    /// Returns true if a period has elapsed since the last fire
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_fire {
            return false;
        }

        self.next_fire += self.period;
        if self.next_fire <= now {
            self.next_fire = now + self.period;
        }
        true
    }

    pub fn next_fire(&self) -> Instant {
        self.next_fire
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Frames-per-second meter, averaged over a fixed window
#[derive(Debug, Clone, Copy)]
pub struct FpsMeter {
    window: f32,
    elapsed: f32,
    frames: u32,
    fps: f32,
}

impl FpsMeter {
    pub fn new(window_secs: f32) -> Self {
        Self {
            window: window_secs,
            elapsed: 0.0,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count a frame, returns true when a new average is available
    pub fn tick(&mut self, delta: f32) -> bool {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed >= self.window {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_each_period() {
        let start = Instant::now();
        let mut timer = Interval::starting_at(Duration::from_secs(5), start);

        assert!(!timer.poll(start + Duration::from_secs(1)));
        assert!(timer.poll(start + Duration::from_secs(5)));
        assert!(!timer.poll(start + Duration::from_secs(6)));
        assert!(timer.poll(start + Duration::from_secs(10)));
    }

    #[test]
    fn interval_coalesces_missed_periods() {
        let start = Instant::now();
        let mut timer = Interval::starting_at(Duration::from_secs(5), start);

        // Stalled for three periods
        assert!(timer.poll(start + Duration::from_secs(16)));
        assert!(!timer.poll(start + Duration::from_secs(17)));
        assert_eq!(timer.next_fire(), start + Duration::from_secs(21));
    }


    #[test]
    fn fps_meter_averages_window() {
        let mut meter = FpsMeter::new(1.0);

        for _ in 0..59 {
            assert!(!meter.tick(1.0 / 60.0));
        }
        assert!(meter.tick(1.0 / 60.0 + 0.001));
        assert!((meter.fps() - 60.0).abs() < 1.0);
    }
}
