//! Impairment effects
//!
//! Everything here is a function of promille except two small timed effects:
//! double vision (random episodes once promille passes a low threshold) and
//! the collision shake impulse after hitting a car.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::per_tick_chance;
use crate::tuning::Tuning;

/// Steering lerp per reference frame, falling linearly from sober to drunk
pub fn lerp_rate(promille: f32, tuning: &Tuning) -> f32 {
    let t = (promille / tuning.max_promille).clamp(0.0, 1.0);
    tuning.lerp_rate_sober - (tuning.lerp_rate_sober - tuning.lerp_rate_drunk) * t
}

/// Wobble phase after `dt` seconds; it spins faster the drunker you are
pub fn advance_wobble(phase: f32, dt: f32, promille: f32) -> f32 {
    (phase + dt * (1.0 + promille)) % std::f32::consts::TAU
}

/// Horizontal sprite offset from wobble
pub fn wobble_offset(phase: f32, promille: f32, tuning: &Tuning) -> f32 {
    phase.sin() * tuning.wobble_intensity * promille
}

/// Random whole-scene jitter above the shake threshold
pub fn impairment_shake<R: Rng>(promille: f32, tuning: &Tuning, rng: &mut R) -> Vec2 {
    if promille <= tuning.shake_threshold {
        return Vec2::ZERO;
    }
    let magnitude = promille - tuning.shake_threshold;
    Vec2::new(
        (rng.random::<f32>() * 2.0 - 1.0) * magnitude,
        (rng.random::<f32>() * 2.0 - 1.0) * magnitude,
    )
}

/// Render blur radius in pixels
pub fn blur_radius(promille: f32, tuning: &Tuning) -> f32 {
    (promille / tuning.max_promille * tuning.max_blur).clamp(0.0, tuning.max_blur)
}

/// A timed double-vision episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DoubleVision {
    pub active: bool,
    /// Simulation time (ms) the episode ends
    pub end_ms: f64,
    /// Ghost sprite strength, `promille / max_promille` at activation
    pub strength: f32,
}

impl DoubleVision {
    /// Expire a finished episode or roll for a new one; returns true on activation
    pub fn update<R: Rng>(
        &mut self,
        now_ms: f64,
        dt: f32,
        promille: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> bool {
        if self.active {
            if now_ms > self.end_ms {
                self.active = false;
            }
            return false;
        }

        if promille > tuning.double_vision_threshold
            && rng.random::<f32>() < per_tick_chance(tuning.double_vision_chance, dt)
        {
            let span = tuning.double_vision_max_ms - tuning.double_vision_min_ms;
            let duration = tuning.double_vision_min_ms + rng.random::<f32>() * span;
            *self = Self {
                active: true,
                end_ms: now_ms + duration as f64,
                strength: (promille / tuning.max_promille).clamp(0.0, 1.0),
            };
            return true;
        }
        false
    }
}

/// Decaying shake and tilt after a car collision
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionShake {
    pub active: bool,
    pub start_ms: f64,
    pub duration_ms: f32,
    pub intensity: f32,
    /// Peak tilt in radians (signed)
    pub rotation: f32,
}

/// One sample of the collision shake
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShakeSample {
    pub offset: Vec2,
    pub rotation: f32,
}

impl CollisionShake {
    pub fn trigger<R: Rng>(&mut self, now_ms: f64, tuning: &Tuning, rng: &mut R) {
        let max = tuning.collision_shake_max_rotation;
        *self = Self {
            active: true,
            start_ms: now_ms,
            duration_ms: tuning.collision_shake_ms,
            intensity: tuning.collision_shake_intensity,
            rotation: rng.random::<f32>() * 2.0 * max - max,
        };
    }

    /// Progress through the impulse, `0..1` while active
    pub fn progress(&self, now_ms: f64) -> Option<f32> {
        if !self.active || self.duration_ms <= 0.0 {
            return None;
        }
        let p = ((now_ms - self.start_ms) as f32 / self.duration_ms).max(0.0);
        (p < 1.0).then_some(p)
    }

    /// Sample the shake, ending the impulse once its duration has elapsed
    ///
    /// Intensity eases out quadratically; the direction wanders along a
    /// Lissajous path with a little noise on top.
    pub fn sample<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> ShakeSample {
        let Some(p) = self.progress(now_ms) else {
            self.active = false;
            return ShakeSample::default();
        };
        let ease = 1.0 - p * p;
        let current = self.intensity * ease;
        let phase = p * 20.0;
        let x_bias = phase.sin() * 0.7;
        let y_bias = (phase * 1.3).cos() * 0.7;
        ShakeSample {
            offset: Vec2::new(
                (rng.random::<f32>() * 0.3 + x_bias) * current,
                (rng.random::<f32>() * 0.3 + y_bias) * current,
            ),
            rotation: self.rotation * ease * (p * std::f32::consts::PI * 8.0).sin(),
        }
    }

    /// Whether the impact flash is still showing
    pub fn flashing(&self, now_ms: f64, flash_ms: f32) -> bool {
        self.progress(now_ms)
            .is_some_and(|_| now_ms - self.start_ms < flash_ms as f64)
    }
}

/// Mutable effect state carried between ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectsState {
    pub wobble_phase: f32,
    pub impairment_shake: Vec2,
    pub double_vision: DoubleVision,
    pub collision_shake: CollisionShake,
    pub collision_sample: ShakeSample,
}

/// Per-frame derived visual and control parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpairmentEffects {
    pub lerp_rate: f32,
    pub wobble_offset: f32,
    /// Impairment shake plus collision shake
    pub shake_offset: Vec2,
    pub rotation: f32,
    pub blur_radius: f32,
    /// Ghost strength while double vision is active
    pub double_vision: Option<f32>,
    pub flash: bool,
}

impl EffectsState {
    /// Advance the effect state by one tick
    pub fn update<R: Rng>(
        &mut self,
        now_ms: f64,
        dt: f32,
        promille: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> bool {
        self.wobble_phase = advance_wobble(self.wobble_phase, dt, promille);
        self.impairment_shake = impairment_shake(promille, tuning, rng);
        self.collision_sample = self.collision_shake.sample(now_ms, rng);
        self.double_vision.update(now_ms, dt, promille, tuning, rng)
    }

    /// Derive this frame's effect parameters
    pub fn derive(&self, now_ms: f64, promille: f32, tuning: &Tuning) -> ImpairmentEffects {
        ImpairmentEffects {
            lerp_rate: lerp_rate(promille, tuning),
            wobble_offset: wobble_offset(self.wobble_phase, promille, tuning),
            shake_offset: self.impairment_shake + self.collision_sample.offset,
            rotation: self.collision_sample.rotation,
            blur_radius: blur_radius(promille, tuning),
            double_vision: self
                .double_vision
                .active
                .then_some(self.double_vision.strength),
            flash: self
                .collision_shake
                .flashing(now_ms, tuning.collision_flash_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_lerp_rate_range() {
        let tuning = Tuning::default();
        assert!((lerp_rate(0.0, &tuning) - 0.1).abs() < 1e-6);
        assert!((lerp_rate(10.0, &tuning) - 0.01).abs() < 1e-6);
        assert!((lerp_rate(5.0, &tuning) - 0.055).abs() < 1e-6);
        assert!((lerp_rate(50.0, &tuning) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_no_wobble_when_sober() {
        let tuning = Tuning::default();
        assert_eq!(wobble_offset(1.2, 0.0, &tuning), 0.0);
        let peak = wobble_offset(std::f32::consts::FRAC_PI_2, 2.0, &tuning);
        assert!(peak > 1.5);
    }

    #[test]
    fn test_wobble_spins_faster_when_drunk() {
        let sober = advance_wobble(0.0, 0.1, 0.0);
        let drunk = advance_wobble(0.0, 0.1, 4.0);
        assert!(drunk > sober);
    }

    #[test]
    fn test_shake_only_above_threshold() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(impairment_shake(5.0, &tuning, &mut rng), Vec2::ZERO);
        for _ in 0..100 {
            let shake = impairment_shake(7.0, &tuning, &mut rng);
            assert!(shake.x.abs() <= 2.0 && shake.y.abs() <= 2.0);
        }
    }

    #[test]
    fn test_blur_capped() {
        let tuning = Tuning::default();
        assert_eq!(blur_radius(0.0, &tuning), 0.0);
        assert!((blur_radius(5.0, &tuning) - 7.5).abs() < 1e-6);
        assert_eq!(blur_radius(20.0, &tuning), tuning.max_blur);
    }

    #[test]
    fn test_double_vision_needs_promille() {
        let tuning = Tuning {
            double_vision_chance: 1.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut dv = DoubleVision::default();
        assert!(!dv.update(0.0, 1.0 / 60.0, 0.05, &tuning, &mut rng));
        assert!(!dv.active);
    }

    #[test]
    fn test_double_vision_lifecycle() {
        let tuning = Tuning {
            double_vision_chance: 1.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut dv = DoubleVision::default();
        assert!(dv.update(1000.0, 1.0 / 60.0, 4.0, &tuning, &mut rng));
        assert!(dv.active);
        assert!((dv.strength - 0.4).abs() < 1e-6);
        let duration = dv.end_ms - 1000.0;
        assert!((2000.0..=5000.0).contains(&duration));

        // Already active: no re-activation, end time unchanged
        let end = dv.end_ms;
        assert!(!dv.update(1500.0, 1.0 / 60.0, 8.0, &tuning, &mut rng));
        assert_eq!(dv.end_ms, end);

        dv.update(end + 1.0, 1.0 / 60.0, 4.0, &tuning, &mut rng);
        assert!(!dv.active);
    }

    #[test]
    fn test_collision_shake_decays_and_ends() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut shake = CollisionShake::default();
        shake.trigger(0.0, &tuning, &mut rng);
        assert!(shake.rotation.abs() <= tuning.collision_shake_max_rotation);
        assert!(shake.flashing(100.0, tuning.collision_flash_ms));
        assert!(!shake.flashing(200.0, tuning.collision_flash_ms));

        let early = shake.sample(10.0, &mut rng);
        assert!(early.offset.length() > 0.0);
        let late = shake.sample(440.0, &mut rng);
        assert!(late.offset.length() < 1.0);

        let done = shake.sample(450.0, &mut rng);
        assert_eq!(done, ShakeSample::default());
        assert!(!shake.active);
    }

    #[test]
    fn test_derive_combines_shakes() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut effects = EffectsState::default();
        effects.collision_shake.trigger(0.0, &tuning, &mut rng);
        effects.update(16.0, 1.0 / 60.0, 0.0, &tuning, &mut rng);
        let derived = effects.derive(16.0, 0.0, &tuning);
        assert_eq!(derived.shake_offset, effects.collision_sample.offset);
        assert!(derived.flash);
        assert_eq!(derived.blur_radius, 0.0);
        assert_eq!(derived.double_vision, None);
    }
}
