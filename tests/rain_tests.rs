use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use storm_scene::config::RainConfig;
use storm_scene::rain::RainField;

#[cfg(test)]
mod rain_field_tests {
    use super::*;

    #[test]
    fn test_drops_stay_between_ground_and_ceiling() {
        let config = RainConfig {
            count: 2_000,
            ..RainConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let mut rain = RainField::scatter(&config, &mut rng);

        for _ in 0..1_000 {
            rain.step();
            assert!(
                rain.positions().iter().all(|p| p.y >= 0.0 && p.y <= config.ceiling),
                "A drop left the [0, ceiling] band"
            );
        }
    }

    #[test]
    fn test_drop_below_one_step_resets_to_ceiling() {
        let mut rain = RainField::from_positions(vec![Vec3::new(1.0, 0.1, -2.0)], 50.0, 0.2);

        rain.step();

        assert_eq!(rain.positions()[0], Vec3::new(1.0, 50.0, -2.0));
    }

    #[test]
    fn test_drop_falls_linearly_until_it_would_cross_ground() {
        let start = 3.0;
        let speed = 0.25;
        let mut rain = RainField::from_positions(vec![Vec3::new(0.0, start, 0.0)], 50.0, speed);

        for k in 1..=12 {
            rain.step();
            let expected = start - k as f32 * speed;
            assert!((rain.positions()[0].y - expected).abs() < 1e-5);
        }

        rain.step();
        assert_eq!(rain.positions()[0].y, 50.0);
    }

    #[test]
    fn test_only_y_changes() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut rain = RainField::scatter(&RainConfig::default(), &mut rng);
        let before: Vec<_> = rain.positions().iter().map(|p| (p.x, p.z)).collect();

        for _ in 0..300 {
            rain.step();
        }

        let after: Vec<_> = rain.positions().iter().map(|p| (p.x, p.z)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_scatter_respects_spread() {
        let config = RainConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let rain = RainField::scatter(&config, &mut rng);
        let half = config.spread / 2.0;

        assert_eq!(rain.len(), config.count);
        assert!(rain
            .positions()
            .iter()
            .all(|p| p.x.abs() <= half && p.z.abs() <= half));
    }
}
