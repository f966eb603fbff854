//! Canvas2D surface.
//!
//! Implements `mg_render::Surface` on an HTML `<canvas>` through
//! `CanvasRenderingContext2d`, so the interactive canvas and thumbnails
//! share the same painters as the SVG and Vello backends.

use mg_core::model::{Point, Rect, Size};
use mg_render::style::Color;
use mg_render::surface::{StrokeStyle, Surface, TextAlign, TextStyle};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

const FONT_FAMILY: &str = "Inter, -apple-system, BlinkMacSystemFont, sans-serif";

pub struct Canvas2dSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    size: Size,
}

impl<'a> Canvas2dSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self {
            ctx,
            size: Size::new(width, height),
        }
    }

    /// Trace a rounded rectangle as the current path.
    fn rounded_rect_path(&self, r: Rect, radius: f64) {
        let radius = radius.min(r.width / 2.0).min(r.height / 2.0).max(0.0);
        let ctx = self.ctx;
        ctx.begin_path();
        if radius == 0.0 {
            ctx.rect(r.x, r.y, r.width, r.height);
            return;
        }
        let (x0, y0, x1, y1) = (r.x, r.y, r.x + r.width, r.y + r.height);
        ctx.move_to(x0 + radius, y0);
        ctx.line_to(x1 - radius, y0);
        ctx.quadratic_curve_to(x1, y0, x1, y0 + radius);
        ctx.line_to(x1, y1 - radius);
        ctx.quadratic_curve_to(x1, y1, x1 - radius, y1);
        ctx.line_to(x0 + radius, y1);
        ctx.quadratic_curve_to(x0, y1, x0, y1 - radius);
        ctx.line_to(x0, y0 + radius);
        ctx.quadratic_curve_to(x0, y0, x0 + radius, y0);
        ctx.close_path();
    }

    fn apply_stroke(&self, stroke: &StrokeStyle) {
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width);
        let dashes = js_sys::Array::new();
        if let Some((dash, gap)) = stroke.dash {
            dashes.push(&JsValue::from_f64(dash));
            dashes.push(&JsValue::from_f64(gap));
        }
        if self.ctx.set_line_dash(&dashes).is_err() {
            log::debug!("canvas2d: set_line_dash rejected");
        }
    }
}

impl Surface for Canvas2dSurface<'_> {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, self.size.width, self.size.height);
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Color) {
        self.rounded_rect_path(rect, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_rect(&mut self, rect: Rect, radius: f64, stroke: &StrokeStyle) {
        self.rounded_rect_path(rect, radius);
        self.apply_stroke(stroke);
        self.ctx.stroke();
    }

    fn line(&mut self, from: Point, to: Point, stroke: &StrokeStyle) {
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let [first, rest @ ..] = points else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let weight = if style.bold { 600 } else { 400 };
        self.ctx
            .set_font(&format!("{weight} {:.1}px {FONT_FAMILY}", style.size));
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        self.ctx.set_text_baseline("top");
        self.ctx.set_fill_style_str(&style.color.to_css());
        if self.ctx.fill_text(text, at.x, at.y).is_err() {
            log::debug!("canvas2d: fill_text rejected");
        }
    }
}
