//! Lane and road geometry
//!
//! The road is three equal lanes laid out as fractions of the viewport width.
//! Geometry is recomputed wholesale on resize and read-only in between.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One of the three road lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Middle,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Middle, Lane::Right];

    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Middle => 1,
            Lane::Right => 2,
        }
    }

    /// Lane by index, clamping out-of-range values to the nearest lane
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Lane::Left,
            1 => Lane::Middle,
            _ => Lane::Right,
        }
    }
}

/// Drawable area size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replace non-finite or negative dimensions with zero
    pub fn sanitized(self) -> Self {
        let fix = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: fix(self.width),
            height: fix(self.height),
        }
    }
}

/// Lane layout: left edge of each lane plus the shared lane width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadGeometry {
    pub left_lane: f32,
    pub middle_lane: f32,
    pub right_lane: f32,
    pub lane_width: f32,
}

impl RoadGeometry {
    pub fn from_viewport(viewport: Viewport) -> Self {
        let w = viewport.sanitized().width;
        Self {
            left_lane: w * LEFT_LANE_FRACTION,
            middle_lane: w * MIDDLE_LANE_FRACTION,
            right_lane: w * RIGHT_LANE_FRACTION,
            lane_width: w * LANE_WIDTH_FRACTION,
        }
    }

    /// Left edge of a lane
    pub fn lane_left(&self, lane: Lane) -> f32 {
        match lane {
            Lane::Left => self.left_lane,
            Lane::Middle => self.middle_lane,
            Lane::Right => self.right_lane,
        }
    }

    /// Center line of a lane
    pub fn lane_center(&self, lane: Lane) -> f32 {
        self.lane_left(lane) + self.lane_width / 2.0
    }

    /// Left edge of the drivable road
    pub fn road_left(&self) -> f32 {
        self.left_lane
    }

    /// Right edge of the drivable road
    pub fn road_right(&self) -> f32 {
        self.right_lane + self.lane_width
    }

    /// Lane under a horizontal screen position
    pub fn lane_at(&self, x: f32) -> Lane {
        if x < self.middle_lane {
            Lane::Left
        } else if x < self.right_lane {
            Lane::Middle
        } else {
            Lane::Right
        }
    }

    /// Allowed range for the left edge of an object `width` pixels wide
    pub fn x_bounds(&self, width: f32) -> (f32, f32) {
        (self.road_left(), self.road_right() - width)
    }
}
