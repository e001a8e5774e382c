//! Game state and core simulation types
//!
//! A `GameState` is one run: created on start, reset in place on restart and
//! dropped when the player returns to the menu.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::EffectsState;
use super::player::PlayerState;
use super::quiz::QuizController;
use super::road::{RoadGeometry, Viewport};
use super::spawner::Obstacle;
use crate::tuning::Tuning;

/// Current mode of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Simulation advancing
    Active,
    /// Quiz pending or paused by the player
    Paused,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    OutOfLives,
    MaxPromille,
}

/// One-shot notifications for audio and presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    CarHit { lives_left: u8 },
    BottleCollected { promille: f32 },
    DoubleVisionStarted,
    QuizShown,
    AnswerCorrect {
        lives: u8,
        explanation: Option<&'static str>,
    },
    AnswerWrong {
        promille: f32,
        explanation: Option<&'static str>,
    },
    /// Whole distance units reached
    Milestone(u32),
    Paused,
    Resumed,
    GameOver {
        cause: GameOverCause,
        distance: f32,
    },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: GameMode,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub road: RoadGeometry,
    pub player: PlayerState,
    pub obstacles: Vec<Obstacle>,
    pub effects: EffectsState,
    pub quiz: QuizController,
    /// Simulation time in ms; only advances while Active
    pub elapsed_ms: f64,
    /// Active ticks since start
    pub time_ticks: u64,
    /// Last milestone announced, in distance units
    pub last_milestone: u32,
    pub game_over_cause: Option<GameOverCause>,
    pub rng: Pcg32,
    /// Events emitted since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a new run
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let viewport = viewport.sanitized();
        let road = RoadGeometry::from_viewport(viewport);
        let player = PlayerState::new(&road, viewport, &tuning);
        Self {
            seed,
            mode: GameMode::Active,
            tuning,
            viewport,
            road,
            player,
            obstacles: Vec::new(),
            effects: EffectsState::default(),
            quiz: QuizController::default(),
            elapsed_ms: 0.0,
            time_ticks: 0,
            last_milestone: 0,
            game_over_cause: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Reset the run in place, whatever mode it is in
    ///
    /// The RNG keeps its stream so a restarted run does not replay the last one.
    pub fn restart(&mut self) {
        self.player = PlayerState::new(&self.road, self.viewport, &self.tuning);
        self.obstacles.clear();
        self.effects = EffectsState::default();
        self.quiz.reset();
        self.elapsed_ms = 0.0;
        self.time_ticks = 0;
        self.last_milestone = 0;
        self.game_over_cause = None;
        self.events.clear();
        self.mode = GameMode::Active;
    }

    /// Recompute road geometry for a new viewport
    pub fn resize(&mut self, viewport: Viewport) {
        let viewport = viewport.sanitized();
        if viewport == self.viewport {
            return;
        }
        let scale = if self.viewport.width > 0.0 {
            viewport.width / self.viewport.width
        } else {
            1.0
        };
        log::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.road = RoadGeometry::from_viewport(viewport);
        self.player.refit(&self.road, viewport, &self.tuning);
        // Lanes are proportional to width, so scaling x keeps obstacles in lane
        for obs in &mut self.obstacles {
            match obs {
                Obstacle::Car { pos, .. } | Obstacle::Bottle { pos, .. } => pos.x *= scale,
            }
        }
    }

    /// Toggle an explicit pause; a pending quiz keeps the run paused
    pub fn toggle_pause(&mut self) {
        match self.mode {
            GameMode::Active => {
                self.mode = GameMode::Paused;
                self.events.push(GameEvent::Paused);
            }
            GameMode::Paused if self.quiz.is_awaiting() => {
                log::debug!("Pause toggle ignored: quiz awaiting answer");
            }
            GameMode::Paused => {
                self.mode = GameMode::Active;
                self.events.push(GameEvent::Resumed);
            }
            GameMode::GameOver => {}
        }
    }

    /// End the run
    pub fn end_run(&mut self, cause: GameOverCause) {
        if self.mode == GameMode::GameOver {
            return;
        }
        self.mode = GameMode::GameOver;
        self.game_over_cause = Some(cause);
        log::info!(
            "Game over ({:?}) at distance {:.2}",
            cause,
            self.player.distance
        );
        self.events.push(GameEvent::GameOver {
            cause,
            distance: self.player.distance,
        });
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
