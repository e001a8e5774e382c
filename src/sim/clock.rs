//! Frame clock
//!
//! Turns host animation-frame timestamps (milliseconds) into guarded frame deltas.

use crate::consts::*;

/// Tracks the last observed timestamp
#[derive(Debug, Clone, Default)]
pub struct Clock {
    last_ms: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Seconds since the previous call, clamped to `[0, MAX_FRAME_DT]`
    ///
    /// The first observation yields one reference frame. Non-finite timestamps
    /// yield zero and are not recorded, so a single bad sample cannot poison
    /// the next delta.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            log::warn!("Ignoring non-finite frame timestamp: {}", now_ms);
            return 0.0;
        }

        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => REFERENCE_FRAME_DT,
        };
        self.last_ms = Some(now_ms);

        if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        }
    }

    /// Forget the last timestamp (new session)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
