//! Collision detection and resolution
//!
//! Hitboxes are the sprite rectangles shrunk inward by a padding so that
//! near misses that look like near misses do not count.

use glam::Vec2;

use super::player::PlayerState;
use super::spawner::Obstacle;
use super::state::GameOverCause;
use crate::tuning::Tuning;

/// Axis-aligned rectangle (top-left origin, screen coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_rect(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Shrink every side by `padding`, never past the center
    pub fn shrink(self, padding: f32) -> Self {
        let center = (self.min + self.max) * 0.5;
        let min = (self.min + Vec2::splat(padding)).min(center);
        let max = (self.max - Vec2::splat(padding)).max(center);
        Self { min, max }
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Player hitbox for the current position
pub fn player_hitbox(player: &PlayerState, tuning: &Tuning) -> Aabb {
    Aabb::from_rect(
        Vec2::new(player.x, player.y),
        Vec2::new(tuning.player_width, tuning.player_height),
    )
    .shrink(tuning.player_hitbox_padding)
}

/// Obstacle hitbox for its current position
pub fn obstacle_hitbox(obstacle: &Obstacle, tuning: &Tuning) -> Aabb {
    Aabb::from_rect(obstacle.pos(), obstacle.size(tuning)).shrink(tuning.obstacle_hitbox_padding)
}

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub cars_hit: u32,
    pub bottles_collected: u32,
    /// Lives reached zero during this pass
    pub out_of_lives: bool,
    /// Promille reached the cap during this pass
    pub max_promille: bool,
}

impl CollisionReport {
    /// Run-ending outcome of this pass; running out of lives wins over promille
    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        if self.out_of_lives {
            Some(GameOverCause::OutOfLives)
        } else if self.max_promille {
            Some(GameOverCause::MaxPromille)
        } else {
            None
        }
    }
}

/// Resolve every obstacle overlapping the player and remove it
///
/// Each overlapping obstacle is removed exactly once and resolved on its own:
/// a car costs one life, a bottle adds `bottle_promille` (clamped).
pub fn resolve(
    player: &mut PlayerState,
    obstacles: &mut Vec<Obstacle>,
    tuning: &Tuning,
) -> CollisionReport {
    let player_box = player_hitbox(player, tuning);

    let mut hits = Vec::new();
    obstacles.retain(|obs| {
        if player_box.intersects(&obstacle_hitbox(obs, tuning)) {
            hits.push(*obs);
            false
        } else {
            true
        }
    });

    let mut report = CollisionReport::default();
    for obs in hits {
        match obs {
            Obstacle::Car { .. } => {
                report.cars_hit += 1;
                if player.lose_life() {
                    report.out_of_lives = true;
                }
            }
            Obstacle::Bottle { .. } => {
                report.bottles_collected += 1;
                if player.add_promille(tuning.bottle_promille, tuning.max_promille) {
                    report.max_promille = true;
                }
            }
        }
    }
    report
}
