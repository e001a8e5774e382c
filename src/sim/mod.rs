//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Time only through the `dt` and timestamps passed in
//! - No rendering, audio or DOM dependencies

pub mod clock;
pub mod collision;
pub mod effects;
pub mod frame;
pub mod player;
pub mod quiz;
pub mod road;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use collision::{Aabb, CollisionReport};
pub use effects::{DoubleVision, EffectsState, ImpairmentEffects};
pub use frame::{Hud, ObstacleSprite, RenderFrame, SpriteKind};
pub use player::{Direction, PlayerState, Steer};
pub use quiz::{QUESTION_POOL, QuizController, QuizQuestion};
pub use road::{Lane, RoadGeometry, Viewport};
pub use session::{Command, Session};
pub use spawner::Obstacle;
pub use state::{GameEvent, GameMode, GameOverCause, GameState};
pub use tick::{TickInput, tick};
