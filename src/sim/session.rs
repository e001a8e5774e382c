//! Session: the run between the menu and the tick
//!
//! Owns at most one `GameState`. Start and restart build or reset it,
//! returning to the menu drops it, so nothing from a finished run can leak
//! into the next.

use super::clock::Clock;
use super::frame::RenderFrame;
use super::road::Viewport;
use super::state::{GameEvent, GameState};
use super::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Commands from the menu collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    ReturnToMenu,
}

#[derive(Debug)]
pub struct Session {
    game: Option<GameState>,
    clock: Clock,
    tuning: Tuning,
    viewport: Viewport,
}

impl Session {
    pub fn new(tuning: Tuning, viewport: Viewport) -> Self {
        Self {
            game: None,
            clock: Clock::new(),
            tuning,
            viewport: viewport.sanitized(),
        }
    }

    pub fn handle(&mut self, command: Command, seed: u64) {
        match command {
            Command::Start => {
                log::info!("Starting run (seed {})", seed);
                self.game = Some(GameState::new(seed, self.viewport, self.tuning.clone()));
            }
            Command::Restart => match self.game.as_mut() {
                Some(game) => {
                    log::info!("Restarting run");
                    game.restart();
                }
                None => {
                    log::info!("Restart with no run in progress, starting (seed {})", seed);
                    self.game = Some(GameState::new(seed, self.viewport, self.tuning.clone()));
                }
            },
            Command::ReturnToMenu => {
                log::info!("Returning to menu");
                self.game = None;
            }
        }
        self.clock.reset();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport.sanitized();
        if let Some(game) = self.game.as_mut() {
            game.resize(self.viewport);
        }
    }

    /// Run one animation frame; `None` while in the menu
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> Option<RenderFrame> {
        let dt = self.clock.delta(now_ms);
        let game = self.game.as_mut()?;
        tick(game, input, dt);
        Some(RenderFrame::capture(game))
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.game
            .as_mut()
            .map(GameState::drain_events)
            .unwrap_or_default()
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }
}
