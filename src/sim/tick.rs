//! Per-frame simulation tick
//!
//! Advances one run by a variable `dt`. Order within an active tick:
//! steering, distance, spawning, obstacle movement, collisions, game over,
//! quiz trigger, effects.

use super::collision;
use super::effects;
use super::player::Steer;
use super::quiz::QuizCheck;
use super::spawner;
use super::state::{GameEvent, GameMode, GameOverCause, GameState};
use crate::consts::MAX_FRAME_DT;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering intent (keys, click, pointer)
    pub steer: Option<Steer>,
    /// Quiz answer index
    pub answer: Option<usize>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
    }

    if let Some(choice) = input.answer {
        answer_quiz(state, choice);
    }

    if state.mode != GameMode::Active {
        return;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        log::warn!("Non-finite dt {}, skipping motion this tick", dt);
        0.0
    };
    state.elapsed_ms += dt as f64 * 1000.0;
    state.time_ticks += 1;

    // Player
    if let Some(steer) = input.steer {
        state.player.steer(steer, &state.road, &state.tuning);
    }
    let lerp = effects::lerp_rate(state.player.promille, &state.tuning);
    state.player.advance(dt, lerp);

    advance_distance(state, dt);
    check_milestone(state);

    // Obstacles
    spawner::try_spawn(
        &mut state.obstacles,
        &state.road,
        &state.tuning,
        &mut state.rng,
        dt,
    );
    for obs in &mut state.obstacles {
        obs.advance(dt);
    }
    let height = state.viewport.height;
    state.obstacles.retain(|obs| !obs.is_past(height));

    // Collisions
    let report = collision::resolve(&mut state.player, &mut state.obstacles, &state.tuning);
    if report.cars_hit > 0 {
        state
            .effects
            .collision_shake
            .trigger(state.elapsed_ms, &state.tuning, &mut state.rng);
        state.events.push(GameEvent::CarHit {
            lives_left: state.player.lives,
        });
    }
    if report.bottles_collected > 0 {
        state.events.push(GameEvent::BottleCollected {
            promille: state.player.promille,
        });
    }
    if let Some(cause) = report.game_over_cause() {
        state.end_run(cause);
        return;
    }

    // Quiz
    match state.quiz.check(
        state.player.distance,
        state.tuning.quiz_interval,
        &mut state.rng,
    ) {
        QuizCheck::Presented(_) => {
            state.mode = GameMode::Paused;
            state.events.push(GameEvent::QuizShown);
        }
        QuizCheck::Idle | QuizCheck::SkippedEmptyPool => {}
    }

    // Effects
    if state.effects.update(
        state.elapsed_ms,
        dt,
        state.player.promille,
        &state.tuning,
        &mut state.rng,
    ) {
        state.events.push(GameEvent::DoubleVisionStarted);
    }
}

/// Distance grows faster the drunker the driver
fn advance_distance(state: &mut GameState, dt: f32) {
    let tuning = &state.tuning;
    let speedup = 1.0 + state.player.promille / tuning.distance_promille_divisor;
    let next = state.player.distance + dt * tuning.distance_rate * speedup;
    if next.is_finite() && next >= state.player.distance {
        state.player.distance = next;
    } else {
        log::warn!("Discarding invalid distance step to {}", next);
    }
}

fn check_milestone(state: &mut GameState) {
    let interval = state.tuning.milestone_interval;
    if interval == 0 {
        return;
    }
    let reached = (state.player.distance / interval as f32).floor() as u32 * interval;
    if reached > state.last_milestone {
        state.last_milestone = reached;
        log::debug!("Milestone reached: {}", reached);
        state.events.push(GameEvent::Milestone(reached));
    }
}

/// Apply a quiz answer; only meaningful while a question is pending
fn answer_quiz(state: &mut GameState, choice: usize) {
    if state.mode != GameMode::Paused {
        return;
    }
    let Some(outcome) = state.quiz.answer(choice) else {
        return;
    };

    let explanation = outcome.question.explanation;
    if outcome.correct {
        state.player.gain_life(state.tuning.max_lives);
        state.events.push(GameEvent::AnswerCorrect {
            lives: state.player.lives,
            explanation,
        });
        state.mode = GameMode::Active;
    } else {
        let amount = state.tuning.wrong_answer_promille;
        let max = state.tuning.max_promille;
        let capped = state.player.add_promille(amount, max);
        state.events.push(GameEvent::AnswerWrong {
            promille: state.player.promille,
            explanation,
        });
        if capped {
            state.end_run(GameOverCause::MaxPromille);
        } else {
            state.mode = GameMode::Active;
        }
    }
}
