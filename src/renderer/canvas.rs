//! Canvas 2D drawing of a `RenderFrame`

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::*;
use crate::settings::Settings;
use crate::sim::{ObstacleSprite, RenderFrame, SpriteKind};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Wrap a canvas; fails if the 2D context is unavailable
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the displayed size; returns the CSS size
    pub fn fit_to_display(&self) -> (f32, f32) {
        let w = self.canvas.client_width().max(1) as u32;
        let h = self.canvas.client_height().max(1) as u32;
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        (w as f32, h as f32)
    }

    pub fn draw(&self, frame: &RenderFrame, settings: &Settings) {
        let effects = settings.filter_effects(&frame.effects);
        let ctx = &self.ctx;
        let w = frame.viewport.width as f64;
        let h = frame.viewport.height as f64;

        ctx.set_filter("none");
        ctx.set_fill_style_str(GRASS_COLOR);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.save();
        ctx.set_filter(&blur_filter(effects.blur_radius));

        // Rotate around the center, then shake
        if effects.rotation != 0.0 {
            ctx.translate(w / 2.0, h / 2.0).ok();
            ctx.rotate(effects.rotation as f64).ok();
            ctx.translate(-w / 2.0, -h / 2.0).ok();
        }
        ctx.translate(effects.shake_offset.x as f64, effects.shake_offset.y as f64)
            .ok();

        self.draw_road(frame, settings);

        for sprite in &frame.obstacles {
            self.draw_obstacle(sprite);
        }

        // Player
        let pos = frame.player_pos;
        let size = frame.player_size;
        ctx.set_fill_style_str(&player_color(frame.hud.promille));
        ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
        if let Some(strength) = effects.double_vision {
            let ghost = pos + ghost_offset(strength);
            ctx.set_global_alpha(ghost_alpha(strength));
            ctx.fill_rect(ghost.x as f64, ghost.y as f64, size.x as f64, size.y as f64);
            ctx.set_global_alpha(1.0);
        }

        ctx.restore();

        if effects.flash {
            ctx.set_fill_style_str(FLASH_COLOR);
            ctx.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn draw_road(&self, frame: &RenderFrame, settings: &Settings) {
        let ctx = &self.ctx;
        let road = &frame.road;
        let h = frame.viewport.height as f64;

        ctx.set_fill_style_str(ROAD_COLOR);
        ctx.fill_rect(
            road.road_left() as f64,
            0.0,
            (road.lane_width * 3.0) as f64,
            h,
        );

        if !settings.quality.lane_markings() {
            return;
        }

        let dash = js_sys::Array::of2(&LANE_DASH[0].into(), &LANE_DASH[1].into());
        ctx.set_line_dash(&dash).ok();
        ctx.set_line_dash_offset(lane_dash_offset(frame.hud.distance));
        ctx.set_stroke_style_str(LANE_MARK_COLOR);
        ctx.set_line_width(4.0);
        ctx.begin_path();
        for x in lane_divider_xs(road) {
            ctx.move_to(x as f64, 0.0);
            ctx.line_to(x as f64, h);
        }
        ctx.stroke();
        ctx.set_line_dash(&js_sys::Array::new()).ok();
    }

    fn draw_obstacle(&self, sprite: &ObstacleSprite) {
        let color = match sprite.kind {
            SpriteKind::Car => car_color(sprite.lane),
            SpriteKind::Bottle => BOTTLE_COLOR,
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            sprite.pos.x as f64,
            sprite.pos.y as f64,
            sprite.size.x as f64,
            sprite.size.y as f64,
        );
    }

    /// Blank the canvas (menu)
    pub fn clear(&self) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }
}
