//! Player controller
//!
//! Input only ever moves `target_x`. The car itself follows the target with an
//! exponential lerp whose rate falls as promille rises, which is where the
//! delayed, floaty steering comes from.

use serde::{Deserialize, Serialize};

use super::road::{Lane, RoadGeometry, Viewport};
use crate::consts::REFERENCE_FPS;
use crate::constrain;
use crate::tuning::Tuning;

/// Discrete steering direction (arrow keys / A-D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// A steering intent from any input device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Steer {
    /// Key press: shift the target by a fraction of a lane
    Nudge(Direction),
    /// Jump to the center of a lane
    Lane(Lane),
    /// Click/tap at a screen X: jump to the center of the lane under it
    ClickAt(f32),
    /// Continuous pointer/touch X: center the car under the pointer
    Pointer(f32),
}

/// The player's car and run statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Left edge of the car sprite (pixels)
    pub x: f32,
    /// Where steering wants the left edge to be (always lane-clamped)
    pub target_x: f32,
    /// Top edge of the car sprite (pixels)
    pub y: f32,
    pub lives: u8,
    /// Impairment meter, `0..=max_promille`
    pub promille: f32,
    /// Distance driven this run
    pub distance: f32,
}

impl PlayerState {
    /// A fresh car centered in the middle lane
    pub fn new(road: &RoadGeometry, viewport: Viewport, tuning: &Tuning) -> Self {
        let x = road.lane_center(Lane::Middle) - tuning.player_width / 2.0;
        Self {
            x,
            target_x: x,
            y: Self::baseline_y(viewport, tuning),
            lives: tuning.max_lives,
            promille: 0.0,
            distance: 0.0,
        }
    }

    /// Vertical position for a viewport
    pub fn baseline_y(viewport: Viewport, tuning: &Tuning) -> f32 {
        (viewport.sanitized().height - tuning.player_bottom_offset).max(0.0)
    }

    /// Left and right limits for the car's left edge
    pub fn bounds(road: &RoadGeometry, tuning: &Tuning) -> (f32, f32) {
        road.x_bounds(tuning.player_width)
    }

    /// Record a steering intent as a new lane-clamped target
    pub fn steer(&mut self, steer: Steer, road: &RoadGeometry, tuning: &Tuning) {
        let half_width = tuning.player_width / 2.0;
        let raw = match steer {
            Steer::Nudge(direction) => {
                self.target_x + road.lane_width * tuning.nudge_fraction * direction.sign()
            }
            Steer::Lane(lane) => road.lane_center(lane) - half_width,
            Steer::ClickAt(x) => road.lane_center(road.lane_at(x)) - half_width,
            Steer::Pointer(x) => x - half_width,
        };
        if !raw.is_finite() {
            log::warn!("Ignoring non-finite steering target: {:?}", steer);
            return;
        }
        self.set_target(raw, road, tuning);
    }

    /// Set the target, clamped to `[road_left, right_lane + lane_width - player_width]`
    pub fn set_target(&mut self, target_x: f32, road: &RoadGeometry, tuning: &Tuning) {
        let (min_x, max_x) = Self::bounds(road, tuning);
        self.target_x = constrain(target_x, min_x, max_x);
    }

    /// Move `x` toward `target_x`
    ///
    /// `lerp_rate` is the fraction of the gap closed per reference frame; it is
    /// rescaled for `dt` so steering feels the same at any frame rate.
    pub fn advance(&mut self, dt: f32, lerp_rate: f32) {
        if dt <= 0.0 {
            return;
        }
        let gap = self.target_x - self.x;
        if gap.abs() < 0.01 {
            self.x = self.target_x;
            return;
        }
        let factor = 1.0 - (1.0 - lerp_rate.clamp(0.0, 1.0)).powf(dt * REFERENCE_FPS);
        self.x += gap * factor;
    }

    /// Re-fit the car after the road changed size
    pub fn refit(&mut self, road: &RoadGeometry, viewport: Viewport, tuning: &Tuning) {
        let (min_x, max_x) = Self::bounds(road, tuning);
        self.x = constrain(self.x, min_x, max_x);
        self.target_x = constrain(self.target_x, min_x, max_x);
        self.y = Self::baseline_y(viewport, tuning);
    }

    /// Lane the car's center is currently in
    pub fn lane(&self, road: &RoadGeometry, tuning: &Tuning) -> Lane {
        road.lane_at(self.x + tuning.player_width / 2.0)
    }

    /// Lose one life; returns true when none are left
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Gain one life up to the cap
    pub fn gain_life(&mut self, max_lives: u8) {
        self.lives = self.lives.saturating_add(1).min(max_lives);
    }

    /// Raise promille, clamped to the cap; returns true when the cap is reached
    pub fn add_promille(&mut self, amount: f32, max_promille: f32) -> bool {
        if amount.is_finite() {
            self.promille = (self.promille + amount).clamp(0.0, max_promille);
        }
        self.promille >= max_promille
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (RoadGeometry, Viewport, Tuning) {
        let viewport = Viewport::new(1000.0, 700.0);
        (RoadGeometry::from_viewport(viewport), viewport, Tuning::default())
    }

    #[test]
    fn test_new_player_centered_in_middle_lane() {
        let (road, viewport, tuning) = setup();
        let player = PlayerState::new(&road, viewport, &tuning);
        assert_eq!(player.x, 450.0);
        assert_eq!(player.target_x, 450.0);
        assert_eq!(player.y, 600.0);
        assert_eq!(player.lives, 5);
        assert_eq!(player.lane(&road, &tuning), Lane::Middle);
    }

    #[test]
    fn test_target_clamped_to_right_edge() {
        let (road, viewport, tuning) = setup();
        let mut player = PlayerState::new(&road, viewport, &tuning);
        player.steer(Steer::Pointer(10_000.0), &road, &tuning);
        // right lane edge + lane width - player width
        assert_eq!(player.target_x, 600.0 + 250.0 - 50.0);
    }

    #[test]
    fn test_target_clamped_to_left_edge() {
        let (road, viewport, tuning) = setup();
        let mut player = PlayerState::new(&road, viewport, &tuning);
        player.steer(Steer::Pointer(-500.0), &road, &tuning);
        assert_eq!(player.target_x, 100.0);
    }

    #[test]
    fn test_nudge_moves_fraction_of_lane() {
        let (road, viewport, tuning) = setup();
        let mut player = PlayerState::new(&road, viewport, &tuning);
        player.steer(Steer::Nudge(Direction::Left), &road, &tuning);
        assert_eq!(player.target_x, 450.0 - 50.0);
        player.steer(Steer::Nudge(Direction::Right), &road, &tuning);
        player.steer(Steer::Nudge(Direction::Right), &road, &tuning);
        assert_eq!(player.target_x, 450.0 + 50.0);
    }

    #[test]
    fn test_click_jumps_to_lane_center() {
        let (road, viewport, tuning) = setup();
        let mut player = PlayerState::new(&road, viewport, &tuning);
        player.steer(Steer::ClickAt(700.0), &road, &tuning);
        assert_eq!(player.target_x, 725.0 - 25.0);
        player.steer(Steer::Lane(Lane::Left), &road, &tuning);
        assert_eq!(player.target_x, 225.0 - 25.0);
    }

    #[test]
    fn test_nan_pointer_ignored() {
        let (road, viewport, tuning) = setup();
        let mut player = PlayerState::new(&road, viewport, &tuning);
        player.steer(Steer::Pointer(f32::NAN), &road, &tuning);
        assert_eq!(player.target_x, 450.0);
    }

    #[test]
    fn test_advance_approaches_without_overshoot() {
        let (road, viewport, tuning) = setup();
        let mut player = PlayerState::new(&road, viewport, &tuning);
        player.set_target(700.0, &road, &tuning);
        let mut last = player.x;
        for _ in 0..120 {
            player.advance(1.0 / 60.0, 0.1);
            assert!(player.x >= last);
            assert!(player.x <= 700.0);
            last = player.x;
        }
        assert!((player.x - 700.0).abs() < 1.0);
    }

    #[test]
    fn test_drunk_lerp_is_slower() {
        let (road, viewport, tuning) = setup();
        let mut sober = PlayerState::new(&road, viewport, &tuning);
        let mut drunk = sober.clone();
        sober.set_target(700.0, &road, &tuning);
        drunk.set_target(700.0, &road, &tuning);
        for _ in 0..10 {
            sober.advance(1.0 / 60.0, 0.1);
            drunk.advance(1.0 / 60.0, 0.01);
        }
        assert!(sober.x > drunk.x);
    }

    #[test]
    fn test_advance_frame_rate_independent() {
        let (road, viewport, tuning) = setup();
        let mut at_60 = PlayerState::new(&road, viewport, &tuning);
        let mut at_120 = at_60.clone();
        at_60.set_target(700.0, &road, &tuning);
        at_120.set_target(700.0, &road, &tuning);
        for _ in 0..30 {
            at_60.advance(1.0 / 60.0, 0.1);
        }
        for _ in 0..60 {
            at_120.advance(1.0 / 120.0, 0.1);
        }
        assert!((at_60.x - at_120.x).abs() < 0.5);
    }

    #[test]
    fn test_lives_and_promille_caps() {
        let (road, viewport, tuning) = setup();
        let mut player = PlayerState::new(&road, viewport, &tuning);
        player.gain_life(5);
        assert_eq!(player.lives, 5);
        player.lives = 1;
        assert!(player.lose_life());
        assert!(player.lose_life());
        assert_eq!(player.lives, 0);

        player.promille = 9.8;
        assert!(player.add_promille(0.5, 10.0));
        assert_eq!(player.promille, 10.0);
    }

    #[test]
    fn test_refit_after_shrink() {
        let (road, viewport, tuning) = setup();
        let mut player = PlayerState::new(&road, viewport, &tuning);
        player.steer(Steer::Lane(Lane::Right), &road, &tuning);
        player.x = player.target_x;

        let small = Viewport::new(400.0, 300.0);
        let small_road = RoadGeometry::from_viewport(small);
        player.refit(&small_road, small, &tuning);
        let (_, max_x) = PlayerState::bounds(&small_road, &tuning);
        assert!(player.x <= max_x);
        assert!(player.target_x <= max_x);
        assert_eq!(player.y, 200.0);
    }
}
