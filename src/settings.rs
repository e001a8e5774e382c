//! Presentation settings and preferences
//!
//! These only change how a frame is shown or heard, never the simulation.
//! Kept in memory for the page's lifetime.

use serde::{Deserialize, Serialize};

use crate::sim::ImpairmentEffects;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    /// Fraction of the blur radius actually applied (canvas filters are costly)
    pub fn blur_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether to draw the scrolling lane markings
    pub fn lane_markings(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Impairment and collision shake
    pub screen_shake: bool,
    /// Promille blur filter
    pub blur: bool,
    /// Ghost sprite during double vision
    pub double_vision: bool,
    /// Red flash on car collisions
    pub collision_flash: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no flash, no ghosting)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),

            screen_shake: true,
            blur: true,
            double_vision: true,
            collision_flash: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective collision flash (respects reduced_motion)
    pub fn effective_collision_flash(&self) -> bool {
        self.collision_flash && !self.reduced_motion
    }

    /// Effective double vision (respects reduced_motion)
    pub fn effective_double_vision(&self) -> bool {
        self.double_vision && !self.reduced_motion
    }

    /// Blur radius to apply for a simulated radius
    pub fn effective_blur(&self, radius: f32) -> f32 {
        if self.blur {
            radius * self.quality.blur_scale()
        } else {
            0.0
        }
    }

    /// Sound effect gain, zero when muted
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Filter derived effects down to what these settings allow on screen
    ///
    /// Steering lag and wobble are gameplay, not decoration, and always pass.
    pub fn filter_effects(&self, effects: &ImpairmentEffects) -> ImpairmentEffects {
        let shake = self.effective_screen_shake();
        ImpairmentEffects {
            shake_offset: if shake {
                effects.shake_offset
            } else {
                glam::Vec2::ZERO
            },
            rotation: if shake { effects.rotation } else { 0.0 },
            blur_radius: self.effective_blur(effects.blur_radius),
            double_vision: effects
                .double_vision
                .filter(|_| self.effective_double_vision()),
            flash: effects.flash && self.effective_collision_flash(),
            ..*effects
        }
    }
}
