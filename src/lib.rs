//! Promille Racer - a three-lane drunk-driving awareness arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, obstacles, collisions, impairment, quiz)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences
//! - `renderer`: HUD formatting and the Canvas 2D render adapter (web only drawing)
//! - `audio`: Procedural feedback sounds (web only playback)

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Frame rate the per-frame balance values were authored against
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Duration of one reference frame in seconds
    pub const REFERENCE_FRAME_DT: f32 = 1.0 / REFERENCE_FPS;
    /// Largest frame delta fed to the simulation (tab switches, debugger stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Road layout as fractions of the viewport width
    pub const LEFT_LANE_FRACTION: f32 = 0.10;
    pub const MIDDLE_LANE_FRACTION: f32 = 0.35;
    pub const RIGHT_LANE_FRACTION: f32 = 0.60;
    pub const LANE_WIDTH_FRACTION: f32 = 0.25;

    /// Default viewport before the first resize event
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
}

/// Convert a per-reference-frame probability into a probability for a tick of `dt` seconds
///
/// `1 - (1 - p)^(dt * 60)`: a chance of 0.03 per 60 Hz frame stays 0.03 per frame at
/// 60 Hz and becomes ~0.015 per frame at 120 Hz.
#[inline]
pub fn per_tick_chance(per_frame: f32, dt: f32) -> f32 {
    if per_frame <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    let frames = dt * consts::REFERENCE_FPS;
    (1.0 - (1.0 - per_frame.min(1.0)).powf(frames)).clamp(0.0, 1.0)
}

/// Constrain a value to `[low, high]` without panicking when the range is inverted
#[inline]
pub fn constrain(value: f32, low: f32, high: f32) -> f32 {
    value.min(high).max(low)
}
