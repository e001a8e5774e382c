//! Render snapshot
//!
//! Everything a presentation layer needs to draw one frame. Built from the
//! state after the tick; drawing code never touches `GameState` directly.

use glam::Vec2;
use serde::Serialize;

use super::effects::ImpairmentEffects;
use super::quiz::QuizQuestion;
use super::road::{Lane, RoadGeometry, Viewport};
use super::spawner::Obstacle;
use super::state::{GameMode, GameOverCause, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Car,
    Bottle,
}

/// One obstacle to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleSprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub lane: Option<Lane>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub distance: f32,
    pub lives: u8,
    pub max_lives: u8,
    pub promille: f32,
    /// Promille is past the shake threshold
    pub promille_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub mode: GameMode,
    pub viewport: Viewport,
    pub road: RoadGeometry,
    /// Player sprite top-left, wobble already applied
    pub player_pos: Vec2,
    pub player_size: Vec2,
    pub effects: ImpairmentEffects,
    pub obstacles: Vec<ObstacleSprite>,
    pub hud: Hud,
    /// Question to show while awaiting an answer
    pub quiz: Option<QuizQuestion>,
    pub game_over: Option<GameOverCause>,
}

impl RenderFrame {
    pub fn capture(state: &GameState) -> Self {
        let tuning = &state.tuning;
        let effects = state
            .effects
            .derive(state.elapsed_ms, state.player.promille, tuning);

        let obstacles = state
            .obstacles
            .iter()
            .map(|obs| ObstacleSprite {
                kind: match obs {
                    Obstacle::Car { .. } => SpriteKind::Car,
                    Obstacle::Bottle { .. } => SpriteKind::Bottle,
                },
                pos: obs.pos(),
                size: obs.size(tuning),
                lane: match *obs {
                    Obstacle::Car { lane, .. } => Some(lane),
                    Obstacle::Bottle { .. } => None,
                },
            })
            .collect();

        Self {
            mode: state.mode,
            viewport: state.viewport,
            road: state.road,
            player_pos: Vec2::new(state.player.x + effects.wobble_offset, state.player.y),
            player_size: Vec2::new(tuning.player_width, tuning.player_height),
            effects,
            obstacles,
            hud: Hud {
                distance: state.player.distance,
                lives: state.player.lives,
                max_lives: tuning.max_lives,
                promille: state.player.promille,
                promille_warning: state.player.promille > tuning.shake_threshold,
            },
            quiz: state.quiz.pending().copied(),
            game_over: state.game_over_cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_reflects_state() {
        let mut state = GameState::new(3, Viewport::new(1000.0, 700.0), Tuning::default());
        state.player.promille = 6.0;
        state.player.distance = 1.5;
        state.obstacles.push(Obstacle::Car {
            pos: Vec2::new(110.0, 20.0),
            lane: Lane::Left,
            speed: 600.0,
        });
        state.obstacles.push(Obstacle::Bottle {
            pos: Vec2::new(400.0, 80.0),
            speed: 300.0,
        });

        let frame = RenderFrame::capture(&state);
        assert_eq!(frame.mode, GameMode::Active);
        assert_eq!(frame.obstacles.len(), 2);
        assert_eq!(frame.obstacles[0].kind, SpriteKind::Car);
        assert_eq!(frame.obstacles[0].lane, Some(Lane::Left));
        assert_eq!(frame.obstacles[1].size, Vec2::new(30.0, 50.0));
        assert_eq!(frame.hud.distance, 1.5);
        assert!(frame.hud.promille_warning);
        assert!((frame.effects.blur_radius - 9.0).abs() < 1e-4);
        assert_eq!(frame.quiz, None);
    }

    #[test]
    fn test_capture_shows_pending_quiz() {
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let mut state = GameState::new(3, Viewport::new(1000.0, 700.0), Tuning::default());
        let mut rng = Pcg32::seed_from_u64(8);
        state.quiz.check(3.1, 3.0, &mut rng);
        state.mode = GameMode::Paused;
        let frame = RenderFrame::capture(&state);
        assert_eq!(frame.mode, GameMode::Paused);
        assert!(frame.quiz.is_some());
    }
}
