//! Egg launch timing
//!
//! Decides when each egg of a level starts falling, how fast, and where.
//! Seeded so a given seed always produces the same level layout.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::settings::GameConfig;

/// How the display should animate one egg's fall
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EggLaunch {
    /// Seconds before the egg starts falling
    pub delay_secs: f32,
    /// Fall speed in px/s
    pub fall_speed: f32,
    /// Horizontal position as a fraction of the stage width, in [0, 1)
    pub x_fraction: f32,
}

impl EggLaunch {
    /// Duration of the fall over `distance` pixels
    pub fn fall_duration(&self, distance: f32) -> f32 {
        distance / self.fall_speed.max(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct LaunchPlanner {
    rng: Pcg32,
    intermission_secs: f32,
    base_fall_speed: f32,
    fall_speed_jitter: f32,
}

impl LaunchPlanner {
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            intermission_secs: config.intermission_secs,
            base_fall_speed: config.base_fall_speed,
            fall_speed_jitter: config.fall_speed_jitter,
        }
    }

    /// Plan the egg with ordinal `index` at the given speed multiplier.
    ///
    /// Ordinal 1 drops right after the intermission so the level never opens with
    /// an empty screen; the others are staggered 2 s apart plus a random
    /// 3-9 s lead that shrinks as the game speeds up.
    pub fn plan(&mut self, index: u32, speed_multiplier: f32) -> EggLaunch {
        let speed_multiplier = speed_multiplier.max(1.0);
        let delay_secs = if index == 1 {
            self.intermission_secs
        } else {
            (self.rng.random::<f32>() * 6.0 + 3.0) / speed_multiplier
                + 2.0 * index as f32
                + self.intermission_secs
        };
        let jitter = (self.rng.random::<f32>() * 2.0 - 1.0) * self.fall_speed_jitter;
        let fall_speed = (self.base_fall_speed * speed_multiplier + jitter).max(1.0);
        let x_fraction = self.rng.random::<f32>();

        EggLaunch {
            delay_secs,
            fall_speed,
            x_fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner(seed: u64) -> LaunchPlanner {
        LaunchPlanner::new(seed, &GameConfig::default())
    }

    #[test]
    fn test_second_egg_drops_after_intermission() {
        let launch = planner(1).plan(1, 1.0);
        assert_eq!(launch.delay_secs, 3.5);
    }

    #[test]
    fn test_delay_bounds() {
        let mut planner = planner(42);
        for index in [0u32, 2, 9] {
            let launch = planner.plan(index, 1.0);
            let min = 3.0 + 2.0 * index as f32 + 3.5;
            let max = 9.0 + 2.0 * index as f32 + 3.5;
            assert!(launch.delay_secs >= min && launch.delay_secs <= max);
            assert!(launch.fall_speed >= 50.0 && launch.fall_speed <= 150.0);
            assert!((0.0..1.0).contains(&launch.x_fraction));
        }
    }

    #[test]
    fn test_faster_levels_fall_faster() {
        let mut planner = planner(7);
        for _ in 0..20 {
            let launch = planner.plan(3, 3.0);
            assert!(launch.fall_speed >= 250.0);
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = planner(99999);
        let mut b = planner(99999);
        for index in 0..10 {
            assert_eq!(a.plan(index, 1.5), b.plan(index, 1.5));
        }
    }

    #[test]
    fn test_fall_duration() {
        let launch = EggLaunch {
            delay_secs: 0.0,
            fall_speed: 100.0,
            x_fraction: 0.5,
        };
        assert!((launch.fall_duration(600.0) - 6.0).abs() < 0.0001);
    }
}
