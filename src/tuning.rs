//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so a balance pass never
//! touches simulation code. Defaults are the canonical values; a JSON
//! document may override any subset of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Lane;

/// Errors raised while loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be between {min:.3} and {max:.3} (got {value:.3})")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("{field} range is inverted (min {min:.3} > max {max:.3})")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

/// Per-lane descent speeds (pixels/second)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneSpeeds {
    pub left: f32,
    pub middle: f32,
    pub right: f32,
}

impl LaneSpeeds {
    pub fn for_lane(&self, lane: Lane) -> f32 {
        match lane {
            Lane::Left => self.left,
            Lane::Middle => self.middle,
            Lane::Right => self.right,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub max_lives: u8,
    pub max_promille: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Player top edge sits this far above the bottom of the viewport
    pub player_bottom_offset: f32,
    /// Keyboard nudge as a fraction of the lane width
    pub nudge_fraction: f32,
    /// Steering lerp per reference frame when sober
    pub lerp_rate_sober: f32,
    /// Steering lerp per reference frame at max promille
    pub lerp_rate_drunk: f32,

    // === Obstacles ===
    pub car_width: f32,
    pub car_height: f32,
    pub bottle_width: f32,
    pub bottle_height: f32,
    pub car_speed: LaneSpeeds,
    pub bottle_speed: f32,
    /// Car spawn chance per reference frame
    pub car_spawn_chance: f32,
    /// Bottle spawn chance per reference frame
    pub bottle_spawn_chance: f32,
    /// Minimum gap below the spawn line before another car may enter the same lane
    pub safe_spawn_distance: f32,

    // === Collisions ===
    pub player_hitbox_padding: f32,
    pub obstacle_hitbox_padding: f32,
    pub bottle_promille: f32,

    // === Distance & quiz ===
    /// Distance units per second while sober
    pub distance_rate: f32,
    /// Promille divisor in `rate * (1 + promille / k)`
    pub distance_promille_divisor: f32,
    pub quiz_interval: f32,
    pub milestone_interval: u32,
    pub wrong_answer_promille: f32,

    // === Impairment effects ===
    pub wobble_intensity: f32,
    pub shake_threshold: f32,
    pub double_vision_threshold: f32,
    pub double_vision_chance: f32,
    pub double_vision_min_ms: f32,
    pub double_vision_max_ms: f32,
    pub max_blur: f32,
    pub collision_shake_intensity: f32,
    pub collision_shake_ms: f32,
    pub collision_shake_max_rotation: f32,
    pub collision_flash_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_lives: 5,
            max_promille: 10.0,
            player_width: 50.0,
            player_height: 70.0,
            player_bottom_offset: 100.0,
            nudge_fraction: 0.2,
            lerp_rate_sober: 0.1,
            lerp_rate_drunk: 0.01,

            car_width: 50.0,
            car_height: 70.0,
            bottle_width: 30.0,
            bottle_height: 50.0,
            car_speed: LaneSpeeds {
                left: 600.0,
                middle: 420.0,
                right: 300.0,
            },
            bottle_speed: 300.0,
            car_spawn_chance: 0.03,
            bottle_spawn_chance: 0.01,
            safe_spawn_distance: 180.0,

            player_hitbox_padding: 10.0,
            obstacle_hitbox_padding: 8.0,
            bottle_promille: 0.2,

            distance_rate: 0.08,
            distance_promille_divisor: 5.0,
            quiz_interval: 3.0,
            milestone_interval: 5,
            wrong_answer_promille: 0.5,

            wobble_intensity: 0.8,
            shake_threshold: 5.0,
            double_vision_threshold: 0.1,
            double_vision_chance: 0.01,
            double_vision_min_ms: 2000.0,
            double_vision_max_ms: 5000.0,
            max_blur: 15.0,
            collision_shake_intensity: 10.0,
            collision_shake_ms: 450.0,
            collision_shake_max_rotation: 0.03,
            collision_flash_ms: 150.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value keeps the simulation well-defined
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("car_spawn_chance", self.car_spawn_chance),
            ("bottle_spawn_chance", self.bottle_spawn_chance),
            ("double_vision_chance", self.double_vision_chance),
            ("lerp_rate_sober", self.lerp_rate_sober),
            ("lerp_rate_drunk", self.lerp_rate_drunk),
        ] {
            in_range(field, value, 0.0, 1.0)?;
        }

        for (field, value) in [
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("bottle_width", self.bottle_width),
            ("bottle_height", self.bottle_height),
            ("car_speed.left", self.car_speed.left),
            ("car_speed.middle", self.car_speed.middle),
            ("car_speed.right", self.car_speed.right),
            ("bottle_speed", self.bottle_speed),
            ("max_promille", self.max_promille),
            ("quiz_interval", self.quiz_interval),
            ("distance_promille_divisor", self.distance_promille_divisor),
            ("collision_shake_ms", self.collision_shake_ms),
        ] {
            positive(field, value)?;
        }

        in_range("max_lives", self.max_lives as f32, 1.0, u8::MAX as f32)?;
        in_range("nudge_fraction", self.nudge_fraction, 0.0, 1.0)?;

        if self.double_vision_min_ms > self.double_vision_max_ms {
            return Err(TuningError::InvalidRange {
                field: "double_vision_ms",
                min: self.double_vision_min_ms,
                max: self.double_vision_max_ms,
            });
        }
        if self.lerp_rate_drunk > self.lerp_rate_sober {
            return Err(TuningError::InvalidRange {
                field: "lerp_rate",
                min: self.lerp_rate_drunk,
                max: self.lerp_rate_sober,
            });
        }

        Ok(())
    }

    /// Car sprite size (width, height)
    pub fn car_size(&self) -> (f32, f32) {
        (self.car_width, self.car_height)
    }

    pub fn bottle_size(&self) -> (f32, f32) {
        (self.bottle_width, self.bottle_height)
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    in_range(field, value, f32::EPSILON, f32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bottle_promille": 0.5, "quiz_interval": 5.0 }"#)
            .expect("partial tuning should parse");
        assert_eq!(tuning.bottle_promille, 0.5);
        assert_eq!(tuning.quiz_interval, 5.0);
        assert_eq!(tuning.max_lives, 5);
        assert_eq!(tuning.car_speed.left, 600.0);
    }

    #[test]
    fn test_rejects_probability_above_one() {
        let err = Tuning::from_json(r#"{ "car_spawn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "car_spawn_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_double_vision_range() {
        let tuning = Tuning {
            double_vision_min_ms: 6000.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_lane_speeds_left_fastest() {
        let speeds = Tuning::default().car_speed;
        assert!(speeds.for_lane(Lane::Left) > speeds.for_lane(Lane::Middle));
        assert!(speeds.for_lane(Lane::Middle) > speeds.for_lane(Lane::Right));
    }
}
