use glam::Vec3;
use rand::Rng;

use crate::config::RainConfig;

/// Fixed-size set of rain drops falling straight down.
///
/// Every drop keeps `0 <= y <= ceiling`. A drop that falls below the ground
/// is put back at exactly `ceiling`, directly above where it landed.
#[derive(Debug, Clone)]
pub struct RainField {
    drops: Vec<Vec3>,
    ceiling: f32,
    fall_speed: f32,
}

impl RainField {
    /// Build a field from explicit drop positions
    pub fn from_positions(drops: Vec<Vec3>, ceiling: f32, fall_speed: f32) -> Self {
        let drops = drops
            .into_iter()
            .map(|d| Vec3::new(d.x, d.y.clamp(0.0, ceiling), d.z))
            .collect();

        Self {
            drops,
            ceiling,
            fall_speed,
        }
    }

    /// Scatter `config.count` drops uniformly over the spread square,
    /// heights uniform in `[0, ceiling)`
    pub fn scatter<R: Rng + ?Sized>(config: &RainConfig, rng: &mut R) -> Self {
        let drops = (0..config.count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * config.spread,
                    rng.gen::<f32>() * config.ceiling,
                    (rng.gen::<f32>() - 0.5) * config.spread,
                )
            })
            .collect();

        Self {
            drops,
            ceiling: config.ceiling,
            fall_speed: config.fall_speed,
        }
    }

    /// Advance every drop by one frame
    pub fn step(&mut self) {
        let (ceiling, fall_speed) = (self.ceiling, self.fall_speed);
        for drop in &mut self.drops {
            drop.y -= fall_speed;
            if drop.y < 0.0 {
                drop.y = ceiling;
            }
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.drops
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scatter_respects_bounds() {
        let config = RainConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let rain = RainField::scatter(&config, &mut rng);

        assert_eq!(rain.len(), 10_000);
        for drop in rain.positions() {
            assert!(drop.x >= -50.0 && drop.x < 50.0);
            assert!(drop.z >= -50.0 && drop.z < 50.0);
            assert!(drop.y >= 0.0 && drop.y < 50.0);
        }
    }

    #[test]
    fn drop_below_ground_resets_to_ceiling() {
        let mut rain = RainField::from_positions(vec![Vec3::new(3.0, 0.1, -2.0)], 50.0, 0.2);
        rain.step();

        assert_eq!(rain.positions()[0], Vec3::new(3.0, 50.0, -2.0));
    }

    #[test]
    fn drop_exactly_at_ground_stays() {
        let mut rain = RainField::from_positions(vec![Vec3::new(0.0, 0.5, 0.0)], 50.0, 0.5);
        rain.step();

        assert_eq!(rain.positions()[0].y, 0.0);
    }

    #[test]
    fn from_positions_clamps_heights() {
        let rain = RainField::from_positions(
            vec![Vec3::new(0.0, -4.0, 0.0), Vec3::new(0.0, 80.0, 0.0)],
            50.0,
            0.2,
        );

        assert_eq!(rain.positions()[0].y, 0.0);
        assert_eq!(rain.positions()[1].y, 50.0);
    }

    #[test]
    fn empty_field_steps_without_panicking() {
        let mut rain = RainField::from_positions(Vec::new(), 50.0, 0.2);
        rain.step();
        assert!(rain.is_empty());
    }
}
