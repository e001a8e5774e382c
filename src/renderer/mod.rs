//! Rendering
//!
//! The simulation hands over a `RenderFrame`; this module turns it into
//! canvas draw calls and DOM text. Layout math and HUD formatting live here
//! so they can be tested natively; the actual drawing is web only.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
#[cfg(target_arch = "wasm32")]
pub use dom::DomOverlay;

use glam::Vec2;

use crate::sim::{Hud, Lane, RoadGeometry};

// === Palette ===
pub const GRASS_COLOR: &str = "#27ae60";
pub const ROAD_COLOR: &str = "#34495e";
pub const LANE_MARK_COLOR: &str = "#ecf0f1";
pub const BOTTLE_COLOR: &str = "#f1c40f";
pub const FLASH_COLOR: &str = "rgba(231, 76, 60, 0.35)";

/// Dash pattern for lane dividers (on, off)
pub const LANE_DASH: [f64; 2] = [20.0, 30.0];
/// Pixels the road scrolls per distance unit
pub const SCROLL_PER_UNIT: f32 = 2000.0;

/// Fill color for an oncoming car
pub fn car_color(lane: Option<Lane>) -> &'static str {
    match lane {
        Some(Lane::Left) => "#e74c3c",
        Some(Lane::Middle) | None => "#3498db",
        Some(Lane::Right) => "#2ecc71",
    }
}

/// Player car gets darker as promille rises
pub fn player_color(promille: f32) -> String {
    let lightness = (70.0 - promille * 5.0).clamp(15.0, 70.0);
    format!("hsl(200, 70%, {:.0}%)", lightness)
}

/// X positions of the two dashed dividers between the lanes
pub fn lane_divider_xs(road: &RoadGeometry) -> [f32; 2] {
    [
        road.lane_left(Lane::Left) + road.lane_width,
        road.lane_left(Lane::Middle) + road.lane_width,
    ]
}

/// Dash offset that makes the markings scroll toward the player
pub fn lane_dash_offset(distance: f32) -> f64 {
    let period = (LANE_DASH[0] + LANE_DASH[1]) as f32;
    -((distance * SCROLL_PER_UNIT) % period) as f64
}

/// Where the ghost copy of the player sits during double vision
pub fn ghost_offset(strength: f32) -> Vec2 {
    Vec2::new(5.0, 2.0) * strength
}

/// Ghost opacity during double vision
pub fn ghost_alpha(strength: f32) -> f64 {
    (0.3 * strength).clamp(0.0, 1.0) as f64
}

/// Canvas filter string for a blur radius
pub fn blur_filter(radius: f32) -> String {
    if radius > 0.05 {
        format!("blur({:.1}px)", radius)
    } else {
        "none".to_string()
    }
}

/// Overlay visibility after switching to the menu or to a fresh run
///
/// Every per-run overlay starts hidden, so nothing from the previous run
/// carries over; the per-frame update re-shows whatever the new run needs.
pub fn screen_visibility(menu: bool) -> [(&'static str, bool); 6] {
    [
        ("start-screen", menu),
        ("game-ui", !menu),
        ("quiz-popup", false),
        ("quiz-explanation", false),
        ("game-over", false),
        ("pause-overlay", false),
    ]
}

/// HUD strings ready for the DOM
#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    pub distance: String,
    pub lives: String,
    pub promille: String,
    /// Width of the promille bar, 0..=100
    pub promille_bar_percent: f32,
    pub warning: bool,
}

impl HudText {
    pub fn from_hud(hud: &Hud, max_promille: f32) -> Self {
        let percent = if max_promille > 0.0 {
            (hud.promille / max_promille * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            distance: format_distance(hud.distance),
            lives: format!("{}/{}", hud.lives, hud.max_lives),
            promille: format!("{:.1}‰", hud.promille),
            promille_bar_percent: percent,
            warning: hud.promille_warning,
        }
    }
}

pub fn format_distance(distance: f32) -> String {
    format!("{:.2} km", distance.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Viewport;

    #[test]
    fn test_dividers_sit_between_lanes() {
        let road = RoadGeometry::from_viewport(Viewport::new(1000.0, 700.0));
        assert_eq!(lane_divider_xs(&road), [350.0, 600.0]);
    }

    #[test]
    fn test_dash_offset_wraps() {
        assert_eq!(lane_dash_offset(0.0), 0.0);
        let offset = lane_dash_offset(123.456);
        assert!(offset <= 0.0 && offset > -50.0);
    }

    #[test]
    fn test_blur_filter() {
        assert_eq!(blur_filter(0.0), "none");
        assert_eq!(blur_filter(7.5), "blur(7.5px)");
    }

    #[test]
    fn test_player_color_darkens() {
        assert_eq!(player_color(0.0), "hsl(200, 70%, 70%)");
        assert_eq!(player_color(10.0), "hsl(200, 70%, 20%)");
        assert_eq!(player_color(100.0), "hsl(200, 70%, 15%)");
    }

    #[test]
    fn test_hud_text() {
        let hud = Hud {
            distance: 3.14159,
            lives: 4,
            max_lives: 5,
            promille: 6.3,
            promille_warning: true,
        };
        let text = HudText::from_hud(&hud, 10.0);
        assert_eq!(text.distance, "3.14 km");
        assert_eq!(text.lives, "4/5");
        assert_eq!(text.promille, "6.3‰");
        assert!((text.promille_bar_percent - 63.0).abs() < 1e-3);
        assert!(text.warning);
    }

    #[test]
    fn test_screen_switch_hides_run_overlays() {
        for menu in [true, false] {
            let visibility = screen_visibility(menu);
            let shown = |id: &str| visibility.iter().find(|(i, _)| *i == id).map(|(_, v)| *v);
            assert_eq!(shown("start-screen"), Some(menu));
            assert_eq!(shown("game-ui"), Some(!menu));
            assert_eq!(shown("quiz-explanation"), Some(false));
            assert_eq!(shown("quiz-popup"), Some(false));
            assert_eq!(shown("game-over"), Some(false));
            assert_eq!(shown("pause-overlay"), Some(false));
        }
    }

    #[test]
    fn test_ghost_scales_with_strength() {
        assert_eq!(ghost_offset(0.0), Vec2::ZERO);
        assert_eq!(ghost_offset(1.0), Vec2::new(5.0, 2.0));
        assert!((ghost_alpha(0.5) - 0.15).abs() < 1e-6);
    }
}
