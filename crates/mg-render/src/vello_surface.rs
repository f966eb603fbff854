//! Vello backend: records surface calls into a `vello::Scene` for GPU
//! rasterization by the host.

use crate::style::Color;
use crate::surface::{StrokeStyle, Surface, TextStyle};
use kurbo::{Affine, BezPath, Cap, Join, Line, Rect as KurboRect, Stroke as KurboStroke};
use mg_core::model::{Point, Rect, Size};
use peniko::{Color as PenikoColor, Fill};
use vello::Scene;

/// Wraps a borrowed `vello::Scene`. The caller owns the scene and submits it
/// to a renderer after painting.
pub struct VelloSurface<'a> {
    scene: &'a mut Scene,
    size: Size,
}

impl<'a> VelloSurface<'a> {
    pub fn new(scene: &'a mut Scene, size: Size) -> Self {
        Self { scene, size }
    }
}

fn to_peniko(c: Color) -> PenikoColor {
    PenikoColor::from_rgba8(c.r, c.g, c.b, c.a)
}

fn to_kurbo_rect(r: Rect) -> KurboRect {
    KurboRect::new(r.x, r.y, r.x + r.width, r.y + r.height)
}

fn to_kurbo_stroke(stroke: &StrokeStyle) -> KurboStroke {
    let base = KurboStroke::new(stroke.width)
        .with_join(Join::Round)
        .with_caps(Cap::Round);
    match stroke.dash {
        Some((dash, gap)) => base.with_dashes(0.0, [dash, gap]),
        None => base,
    }
}

impl Surface for VelloSurface<'_> {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.scene.reset();
        let full = KurboRect::new(0.0, 0.0, self.size.width, self.size.height);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, to_peniko(color), None, &full);
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Color) {
        let shape = to_kurbo_rect(rect).to_rounded_rect(radius);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, to_peniko(color), None, &shape);
    }

    fn stroke_rect(&mut self, rect: Rect, radius: f64, stroke: &StrokeStyle) {
        let shape = to_kurbo_rect(rect).to_rounded_rect(radius);
        self.scene.stroke(
            &to_kurbo_stroke(stroke),
            Affine::IDENTITY,
            to_peniko(stroke.color),
            None,
            &shape,
        );
    }

    fn line(&mut self, from: Point, to: Point, stroke: &StrokeStyle) {
        let shape = Line::new((from.x, from.y), (to.x, to.y));
        self.scene.stroke(
            &to_kurbo_stroke(stroke),
            Affine::IDENTITY,
            to_peniko(stroke.color),
            None,
            &shape,
        );
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.len() < 2 {
            return;
        }
        let mut bez = BezPath::new();
        bez.move_to((first.x, first.y));
        for p in rest {
            bez.line_to((p.x, p.y));
        }
        bez.close_path();
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, to_peniko(color), None, &bez);
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle) {
        // Glyph shaping is left to the host's text layer.
        log::trace!(
            "vello: text {:?} at ({:.1}, {:.1}) size {:.1}",
            text,
            at.x,
            at.y,
            style.size
        );
    }
}
