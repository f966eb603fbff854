//! Screen ↔ world coordinate transforms.
//!
//! `world = (screen - origin - pan) / zoom`, per axis. `origin` is the
//! top-left corner of the drawing surface in the pointer's coordinate space
//! (e.g. the canvas element's client offset).

use crate::model::{Point, Rect, Size};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;
/// Zoom increment used by the zoom controls.
pub const ZOOM_STEP: f64 = 0.1;

/// The `{zoom, pan}` pair mapping world space to screen space.
///
/// `zoom` is private so it can never leave `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ZERO,
        }
    }
}

/// Clamp a requested zoom into bounds. NaN resets to 1.0.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        1.0
    } else {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

impl Viewport {
    pub fn new(zoom: f64, pan: Point) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Same pan, zoom replaced (clamped).
    #[must_use]
    pub fn with_zoom(self, zoom: f64) -> Self {
        Self::new(zoom, self.pan)
    }

    /// `zoom' = clamp(zoom + delta, MIN_ZOOM, MAX_ZOOM)`.
    #[must_use]
    pub fn zoom_by(self, delta: f64) -> Self {
        self.with_zoom(self.zoom + delta)
    }

    #[must_use]
    pub fn pan_by(self, dx: f64, dy: f64) -> Self {
        Self {
            pan: Point::new(self.pan.x + dx, self.pan.y + dy),
            ..self
        }
    }

    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }

    /// Zoom and pan that frame `bounds` inside a surface of `surface` size,
    /// keeping `padding` screen pixels free on each side. Zoom is clamped, so
    /// very large or very small content is not guaranteed to fit exactly.
    pub fn fit_to_bounds(bounds: Rect, surface: Size, padding: f64) -> Self {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return Self::default();
        }
        let avail_w = (surface.width - 2.0 * padding).max(1.0);
        let avail_h = (surface.height - 2.0 * padding).max(1.0);
        let zoom = clamp_zoom((avail_w / bounds.width).min(avail_h / bounds.height));

        // Center the content: screen center == world center after transform.
        let center = bounds.center();
        let pan = Point::new(
            surface.width / 2.0 - center.x * zoom,
            surface.height / 2.0 - center.y * zoom,
        );
        Self { zoom, pan }
    }
}

/// Convert a pointer position to world coordinates.
pub fn screen_to_world(screen: Point, origin: Point, viewport: &Viewport) -> Point {
    Point::new(
        (screen.x - origin.x - viewport.pan.x) / viewport.zoom,
        (screen.y - origin.y - viewport.pan.y) / viewport.zoom,
    )
}

/// Inverse of [`screen_to_world`].
pub fn world_to_screen(world: Point, origin: Point, viewport: &Viewport) -> Point {
    Point::new(
        world.x * viewport.zoom + viewport.pan.x + origin.x,
        world.y * viewport.zoom + viewport.pan.y + origin.y,
    )
}
