//! Obstacle types and spawning
//!
//! Cars enter in a random lane with a lane-dependent speed (oncoming traffic in
//! the left lane is fastest). Bottles enter anywhere on the road.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::road::{Lane, RoadGeometry};
use crate::per_tick_chance;
use crate::tuning::Tuning;

/// Something coming down the road
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Costs a life on contact
    Car { pos: Vec2, lane: Lane, speed: f32 },
    /// Raises promille on contact
    Bottle { pos: Vec2, speed: f32 },
}

impl Obstacle {
    /// Top-left corner of the sprite
    pub fn pos(&self) -> Vec2 {
        match *self {
            Obstacle::Car { pos, .. } | Obstacle::Bottle { pos, .. } => pos,
        }
    }

    /// Sprite size (width, height)
    pub fn size(&self, tuning: &Tuning) -> Vec2 {
        let (w, h) = match self {
            Obstacle::Car { .. } => tuning.car_size(),
            Obstacle::Bottle { .. } => tuning.bottle_size(),
        };
        Vec2::new(w, h)
    }

    /// Move down the road
    pub fn advance(&mut self, dt: f32) {
        match self {
            Obstacle::Car { pos, speed, .. } | Obstacle::Bottle { pos, speed } => {
                pos.y += *speed * dt;
            }
        }
    }

    /// Whether the sprite's top edge has passed the bottom of the viewport
    pub fn is_past(&self, viewport_height: f32) -> bool {
        self.pos().y > viewport_height
    }
}

/// Whether a lane has a car too close to the spawn line for another to enter
pub fn lane_blocked(obstacles: &[Obstacle], lane: Lane, tuning: &Tuning) -> bool {
    obstacles.iter().any(|obs| match *obs {
        Obstacle::Car { pos, lane: l, .. } => {
            l == lane && pos.y < tuning.safe_spawn_distance - tuning.car_height
        }
        Obstacle::Bottle { .. } => false,
    })
}

/// Roll for new cars and bottles for a tick of `dt` seconds
pub fn try_spawn<R: Rng>(
    obstacles: &mut Vec<Obstacle>,
    road: &RoadGeometry,
    tuning: &Tuning,
    rng: &mut R,
    dt: f32,
) {
    if rng.random::<f32>() < per_tick_chance(tuning.car_spawn_chance, dt) {
        let lane = Lane::from_index(rng.random_range(0..3));
        // Occupied lane: no car this tick
        if !lane_blocked(obstacles, lane, tuning) {
            let slack = (road.lane_width - tuning.car_width).max(0.0);
            let x = road.lane_left(lane) + rng.random::<f32>() * slack;
            obstacles.push(Obstacle::Car {
                pos: Vec2::new(x, -tuning.car_height),
                lane,
                speed: tuning.car_speed.for_lane(lane),
            });
        }
    }

    if rng.random::<f32>() < per_tick_chance(tuning.bottle_spawn_chance, dt) {
        let slack = (road.lane_width * 3.0 - tuning.bottle_width).max(0.0);
        let x = road.road_left() + rng.random::<f32>() * slack;
        obstacles.push(Obstacle::Bottle {
            pos: Vec2::new(x, -tuning.bottle_height),
            speed: tuning.bottle_speed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::road::Viewport;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn road() -> RoadGeometry {
        RoadGeometry::from_viewport(Viewport::new(1000.0, 700.0))
    }

    fn always_cars() -> Tuning {
        Tuning {
            car_spawn_chance: 1.0,
            bottle_spawn_chance: 0.0,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_car_spawns_inside_its_lane() {
        let road = road();
        let tuning = always_cars();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let mut obstacles = Vec::new();
            try_spawn(&mut obstacles, &road, &tuning, &mut rng, 1.0 / 60.0);
            let Some(Obstacle::Car { pos, lane, speed }) = obstacles.first().copied() else {
                panic!("expected a car");
            };
            assert!(pos.x >= road.lane_left(lane));
            let lane_right = road.lane_left(lane) + road.lane_width;
            assert!(pos.x + tuning.car_width <= lane_right + 1e-3);
            assert_eq!(pos.y, -tuning.car_height);
            assert_eq!(speed, tuning.car_speed.for_lane(lane));
        }
    }

    #[test]
    fn test_bottle_spawns_on_road() {
        let road = road();
        let tuning = Tuning {
            car_spawn_chance: 0.0,
            bottle_spawn_chance: 1.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut obstacles = Vec::new();
        for _ in 0..50 {
            try_spawn(&mut obstacles, &road, &tuning, &mut rng, 1.0 / 60.0);
        }
        assert_eq!(obstacles.len(), 50);
        for obs in &obstacles {
            assert!(matches!(obs, Obstacle::Bottle { .. }));
            assert!(obs.pos().x >= road.road_left());
            let right = obs.pos().x + tuning.bottle_width;
            assert!(right <= road.road_right() + 1e-3);
        }
    }

    #[test]
    fn test_safe_distance_prevents_stacking() {
        let road = road();
        let tuning = always_cars();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut obstacles = Vec::new();
        // Without cars moving, at most one car per lane can ever appear
        for _ in 0..200 {
            try_spawn(&mut obstacles, &road, &tuning, &mut rng, 1.0 / 60.0);
        }
        assert!(obstacles.len() <= 3);
        for lane in Lane::ALL {
            let count = obstacles
                .iter()
                .filter(|o| matches!(o, Obstacle::Car { lane: l, .. } if *l == lane))
                .count();
            assert!(count <= 1);
        }
    }

    #[test]
    fn test_lane_frees_after_car_descends() {
        let tuning = Tuning::default();
        let mut obstacles = vec![Obstacle::Car {
            pos: Vec2::new(120.0, -tuning.car_height),
            lane: Lane::Left,
            speed: 600.0,
        }];
        assert!(lane_blocked(&obstacles, Lane::Left, &tuning));
        assert!(!lane_blocked(&obstacles, Lane::Right, &tuning));
        obstacles[0].advance(1.0);
        assert!(!lane_blocked(&obstacles, Lane::Left, &tuning));
    }

    #[test]
    fn test_zero_dt_never_spawns() {
        let road = road();
        let tuning = Tuning {
            car_spawn_chance: 1.0,
            bottle_spawn_chance: 1.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut obstacles = Vec::new();
        try_spawn(&mut obstacles, &road, &tuning, &mut rng, 0.0);
        assert!(obstacles.is_empty());
    }

    #[test]
    fn test_obstacle_advance_and_past() {
        let mut bottle = Obstacle::Bottle {
            pos: Vec2::new(0.0, -50.0),
            speed: 300.0,
        };
        bottle.advance(0.5);
        assert_eq!(bottle.pos().y, 100.0);
        assert!(!bottle.is_past(700.0));
        bottle.advance(2.1);
        assert!(bottle.is_past(700.0));
    }
}
