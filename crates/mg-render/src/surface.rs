//! Drawing-surface abstraction.
//!
//! The painters in this crate never touch a concrete drawing API. They
//! issue immediate-mode calls on a `Surface`, in screen coordinates, and
//! each backend (SVG string, Vello scene, HTML canvas) implements it.

use crate::style::Color;
use mg_core::model::{Point, Rect, Size};
use std::fmt::Write as _;

/// Stroke parameters for lines and outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    /// `(dash, gap)` lengths; `None` draws a solid line.
    pub dash: Option<(f64, f64)>,
}

impl StrokeStyle {
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub const fn dashed(color: Color, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f64,
    pub bold: bool,
    pub align: TextAlign,
}

/// Immediate-mode drawing target. Coordinates are screen pixels.
pub trait Surface {
    /// Drawable area.
    fn size(&self) -> Size;

    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Color);

    fn stroke_rect(&mut self, rect: Rect, radius: f64, stroke: &StrokeStyle);

    fn line(&mut self, from: Point, to: Point, stroke: &StrokeStyle);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], color: Color);

    /// Draw text with its top edge at `at.y`.
    fn text(&mut self, at: Point, text: &str, style: &TextStyle);
}

// ─── SVG backend ─────────────────────────────────────────────────────────

/// Renders into an SVG document string. Used for exports and tests.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: Size,
    body: String,
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn stroke_attrs(stroke: &StrokeStyle) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{}""#,
        stroke.color.to_css(),
        stroke.width
    );
    if let Some((dash, gap)) = stroke.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{dash} {gap}""#);
    }
    attrs
}

impl SvgSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            body: String::new(),
        }
    }

    /// Close the document and return it.
    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = self.size.width,
            h = self.size.height,
            body = self.body
        )
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.body.clear();
        let _ = write!(
            self.body,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.size.width,
            self.size.height,
            color.to_css()
        );
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Color) {
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{radius}" fill="{}"/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            color.to_css()
        );
    }

    fn stroke_rect(&mut self, rect: Rect, radius: f64, stroke: &StrokeStyle) {
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{radius}" fill="none" {}/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            stroke_attrs(stroke)
        );
    }

    fn line(&mut self, from: Point, to: Point, stroke: &StrokeStyle) {
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            stroke_attrs(stroke)
        );
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        let pts: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
        let _ = write!(
            self.body,
            r#"<polygon points="{}" fill="{}"/>"#,
            pts.join(" "),
            color.to_css()
        );
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
        };
        let weight = if style.bold { 600 } else { 400 };
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-size="{}" font-weight="{weight}" text-anchor="{anchor}" dominant-baseline="hanging" fill="{}">{}</text>"#,
            at.x,
            at.y,
            style.size,
            style.color.to_css(),
            escape_xml(text)
        );
    }
}

// ─── Recording backend (tests) ───────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_escapes_text_and_wraps_document() {
        let mut svg = SvgSurface::new(Size::new(100.0, 50.0));
        svg.clear(Color::rgb(255, 255, 255));
        svg.text(
            Point::new(1.0, 2.0),
            "a < b & \"c\"",
            &TextStyle {
                color: Color::rgb(0, 0, 0),
                size: 12.0,
                bold: false,
                align: TextAlign::Left,
            },
        );
        let doc = svg.finish();
        assert!(doc.starts_with("<svg"));
        assert!(doc.ends_with("</svg>"));
        assert!(doc.contains("a &lt; b &amp; &quot;c&quot;"));
    }

    #[test]
    fn svg_dashed_line_has_dasharray() {
        let mut svg = SvgSurface::new(Size::new(10.0, 10.0));
        svg.line(
            Point::ZERO,
            Point::new(5.0, 5.0),
            &StrokeStyle::dashed(Color::rgb(1, 2, 3), 1.5, 6.0, 4.0),
        );
        assert!(svg.finish().contains(r#"stroke-dasharray="6 4""#));
    }

    #[test]
    fn degenerate_polygon_is_skipped() {
        let mut svg = SvgSurface::new(Size::new(10.0, 10.0));
        svg.fill_polygon(&[Point::ZERO, Point::new(1.0, 1.0)], Color::rgb(0, 0, 0));
        assert!(!svg.finish().contains("<polygon"));
    }
}
