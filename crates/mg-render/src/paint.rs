//! Scene → surface drawing commands.
//!
//! Edges are painted first (so nodes cover their ends), then nodes in
//! z-order, then transient overlays (the connect preview). Every world
//! coordinate goes through a `Projection` before it reaches the surface.

use crate::hit::hit_test_rect;
use crate::style::{CanvasTheme, edge_style, node_style};
use crate::surface::{StrokeStyle, Surface, TextAlign, TextStyle};
use mg_core::id::NodeId;
use mg_core::model::{Edge, Node, Point, Rect};
use mg_core::scene::SceneModel;
use mg_core::viewport::{Viewport, world_to_screen};

/// Arrowhead length in screen pixels (before stroke-width growth).
const ARROW_LENGTH: f64 = 10.0;
/// Half-angle of the arrowhead, radians.
const ARROW_SPREAD: f64 = 0.4;
/// Node label font size at zoom 1.
const LABEL_SIZE: f64 = 13.0;
const BADGE_SIZE: f64 = 9.0;
const NODE_PADDING: f64 = 10.0;

/// World → screen mapping: `screen = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub offset: Point,
}

impl Projection {
    /// The interactive canvas mapping for `viewport` on a surface whose
    /// top-left sits at `origin` in pointer space.
    ///
    /// Surfaces draw in their own local pixels, so the origin is folded
    /// out again: only pan and zoom remain.
    pub fn from_viewport(viewport: &Viewport, origin: Point) -> Self {
        let zero = world_to_screen(Point::ZERO, origin, viewport);
        Self {
            scale: viewport.zoom(),
            offset: zero - origin,
        }
    }

    pub fn point(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    pub fn rect(&self, r: Rect) -> Rect {
        let tl = self.point(Point::new(r.x, r.y));
        Rect::new(tl.x, tl.y, r.width * self.scale, r.height * self.scale)
    }

    /// The world rectangle visible on a surface of the given size.
    pub fn visible_world(&self, width: f64, height: f64) -> Rect {
        let tl = Point::new(-self.offset.x / self.scale, -self.offset.y / self.scale);
        Rect::new(tl.x, tl.y, width / self.scale, height / self.scale)
    }
}

/// A connect gesture in progress: a dashed line from the source node's
/// centre to the live pointer (world coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectPreview {
    pub source: NodeId,
    pub pointer: Point,
}

/// Interaction-dependent decorations for the interactive canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overlay {
    pub selected: Option<NodeId>,
    pub preview: Option<ConnectPreview>,
}

/// What the painters need to know about the level of detail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Detail {
    pub labels: bool,
    pub edge_labels: bool,
}

impl Detail {
    pub(crate) const FULL: Detail = Detail {
        labels: true,
        edge_labels: true,
    };
}

/// Paint the interactive canvas.
///
/// Call once per frame; the surface is cleared first.
pub fn paint_scene(
    surface: &mut dyn Surface,
    scene: &SceneModel,
    viewport: &Viewport,
    origin: Point,
    overlay: &Overlay,
    theme: &CanvasTheme,
) {
    let projection = Projection::from_viewport(viewport, origin);
    surface.clear(theme.bg);

    let size = surface.size();
    let visible = projection.visible_world(size.width, size.height);
    let on_screen = hit_test_rect(visible, scene.nodes_in_z_order());
    log::trace!(
        "paint: {}/{} nodes visible at zoom {:.2}",
        on_screen.len(),
        scene.node_count(),
        viewport.zoom()
    );

    for edge in scene.edges() {
        if let (Some(a), Some(b)) = (scene.node(edge.source), scene.node(edge.target)) {
            paint_edge(surface, &projection, edge, a, b, Detail::FULL);
        }
    }

    for node in on_screen {
        let selected = overlay.selected == Some(node.id);
        paint_node(surface, &projection, node, selected, theme, Detail::FULL);
    }

    if let Some(preview) = overlay.preview
        && let Some(source) = scene.node(preview.source)
    {
        let from = projection.point(source.center());
        let to = projection.point(preview.pointer);
        surface.line(from, to, &StrokeStyle::dashed(theme.preview, 1.5, 6.0, 4.0));
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

pub(crate) fn paint_edge(
    surface: &mut dyn Surface,
    projection: &Projection,
    edge: &Edge,
    source: &Node,
    target: &Node,
    detail: Detail,
) {
    let style = edge_style(edge.tier);
    let width = style.width * projection.scale.max(0.5);
    let from = projection.point(source.center());
    let to = projection.point(target.center());
    surface.line(from, to, &StrokeStyle::solid(style.color, width));

    let tip = border_point(projection.rect(target.bounds()), from);
    paint_arrowhead(surface, from, tip, style.color, width);

    if detail.edge_labels && !edge.label.is_empty() {
        let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
        surface.text(
            mid,
            &edge.label,
            &TextStyle {
                color: style.color,
                size: 11.0,
                bold: false,
                align: TextAlign::Center,
            },
        );
    }
}

/// Filled triangle pointing along `from → tip`, apex at `tip`.
pub(crate) fn paint_arrowhead(
    surface: &mut dyn Surface,
    from: Point,
    tip: Point,
    color: crate::style::Color,
    line_width: f64,
) {
    let points = arrowhead(from, tip, ARROW_LENGTH + line_width * 1.5);
    surface.fill_polygon(&points, color);
}

/// Vertices of an arrowhead of `length` with apex at `tip`.
pub fn arrowhead(from: Point, tip: Point, length: f64) -> [Point; 3] {
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    [
        tip,
        Point::new(
            tip.x - length * (angle - ARROW_SPREAD).cos(),
            tip.y - length * (angle - ARROW_SPREAD).sin(),
        ),
        Point::new(
            tip.x - length * (angle + ARROW_SPREAD).cos(),
            tip.y - length * (angle + ARROW_SPREAD).sin(),
        ),
    ]
}

/// Where the segment from `rect`'s centre towards `toward` leaves `rect`.
/// Returns the centre itself when `toward` is the centre.
pub fn border_point(rect: Rect, toward: Point) -> Point {
    let c = rect.center();
    let (dx, dy) = (toward.x - c.x, toward.y - c.y);
    if dx == 0.0 && dy == 0.0 {
        return c;
    }
    let (hw, hh) = (rect.width / 2.0, rect.height / 2.0);
    let tx = if dx != 0.0 { hw / dx.abs() } else { f64::INFINITY };
    let ty = if dy != 0.0 { hh / dy.abs() } else { f64::INFINITY };
    let t = tx.min(ty).min(1.0);
    Point::new(c.x + dx * t, c.y + dy * t)
}

// ─── Nodes ───────────────────────────────────────────────────────────────

pub(crate) fn paint_node(
    surface: &mut dyn Surface,
    projection: &Projection,
    node: &Node,
    selected: bool,
    theme: &CanvasTheme,
    detail: Detail,
) {
    let style = node_style(node.kind);
    let rect = projection.rect(node.bounds());
    let radius = style.corner_radius * projection.scale;

    surface.fill_rect(rect, radius, style.fill);
    surface.stroke_rect(rect, radius, &StrokeStyle::solid(style.stroke, 1.5));

    if selected {
        let halo = Rect::new(rect.x - 2.0, rect.y - 2.0, rect.width + 4.0, rect.height + 4.0);
        surface.stroke_rect(halo, radius + 2.0, &StrokeStyle::solid(theme.selection, 2.0));
    }

    if !detail.labels {
        return;
    }

    let pad = NODE_PADDING * projection.scale;
    surface.text(
        Point::new(rect.x + pad, rect.y + pad),
        style.badge,
        &TextStyle {
            color: style.stroke,
            size: BADGE_SIZE * projection.scale,
            bold: true,
            align: TextAlign::Left,
        },
    );
    let label = if node.label.is_empty() {
        "Untitled"
    } else {
        node.label.as_str()
    };
    surface.text(
        Point::new(rect.x + pad, rect.y + pad + (BADGE_SIZE + 6.0) * projection.scale),
        label,
        &TextStyle {
            color: style.text,
            size: LABEL_SIZE * projection.scale,
            bold: true,
            align: TextAlign::Left,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawOp, RecordingSurface};
    use mg_core::model::{NodeKind, NodeSpec};

    const EPS: f64 = 1e-9;

    fn two_node_scene() -> (SceneModel, NodeId, NodeId) {
        let mut scene = SceneModel::new();
        let a = scene
            .add_node(NodeSpec::new(NodeKind::Memory).label("A").at(0.0, 0.0).size(100.0, 50.0))
            .id;
        let b = scene
            .add_node(NodeSpec::new(NodeKind::Logic).label("B").at(300.0, 0.0).size(100.0, 50.0))
            .id;
        (scene, a, b)
    }

    #[test]
    fn projection_matches_viewport_transform() {
        let vp = Viewport::new(1.5, Point::new(20.0, -10.0));
        let origin = Point::new(100.0, 50.0);
        let proj = Projection::from_viewport(&vp, origin);
        let p = Point::new(33.0, 44.0);
        let expected = world_to_screen(p, origin, &vp) - origin;
        let got = proj.point(p);
        assert!((got.x - expected.x).abs() < EPS && (got.y - expected.y).abs() < EPS);
    }

    #[test]
    fn arrowhead_points_back_along_edge() {
        let [apex, left, right] = arrowhead(Point::ZERO, Point::new(100.0, 0.0), 10.0);
        assert_eq!(apex, Point::new(100.0, 0.0));
        assert!(left.x < 100.0 && right.x < 100.0);
        assert!((left.y + right.y).abs() < EPS, "wings symmetric about the edge");
    }

    #[test]
    fn border_point_lands_on_rect_edge() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let p = border_point(r, Point::new(-500.0, 25.0));
        assert!((p.x - 0.0).abs() < EPS && (p.y - 25.0).abs() < EPS);
        let p = border_point(r, Point::new(50.0, 500.0));
        assert!((p.x - 50.0).abs() < EPS && (p.y - 50.0).abs() < EPS);
        assert_eq!(border_point(r, r.center()), r.center());
    }

    #[test]
    fn edge_is_drawn_between_centres_with_arrowhead() {
        let (mut scene, a, b) = two_node_scene();
        scene.add_edge(a, b, "default");
        let mut surface = RecordingSurface::new(800.0, 600.0);
        paint_scene(
            &mut surface,
            &scene,
            &Viewport::default(),
            Point::ZERO,
            &Overlay::default(),
            &CanvasTheme::light(),
        );

        let lines = surface.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].0, lines[0].1), (Point::new(50.0, 25.0), Point::new(350.0, 25.0)));
        let polygons = surface.count(|op| matches!(op, DrawOp::Polygon(..)));
        assert_eq!(polygons, 1);
        match surface.ops.iter().find(|op| matches!(op, DrawOp::Polygon(..))) {
            Some(DrawOp::Polygon(pts, _)) => {
                assert!((pts[0].x - 300.0).abs() < EPS && (pts[0].y - 25.0).abs() < EPS)
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn preview_line_only_while_connecting() {
        let (scene, a, _) = two_node_scene();
        let theme = CanvasTheme::light();

        let mut idle = RecordingSurface::new(800.0, 600.0);
        paint_scene(
            &mut idle,
            &scene,
            &Viewport::default(),
            Point::ZERO,
            &Overlay::default(),
            &theme,
        );
        assert!(idle.lines().is_empty());

        let overlay = Overlay {
            selected: None,
            preview: Some(ConnectPreview {
                source: a,
                pointer: Point::new(200.0, 200.0),
            }),
        };
        let mut connecting = RecordingSurface::new(800.0, 600.0);
        paint_scene(&mut connecting, &scene, &Viewport::default(), Point::ZERO, &overlay, &theme);
        let lines = connecting.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Point::new(50.0, 25.0));
        assert_eq!(lines[0].1, Point::new(200.0, 200.0));
        assert!(lines[0].2.dash.is_some());
    }

    #[test]
    fn selected_node_gets_highlight() {
        let (scene, a, _) = two_node_scene();
        let theme = CanvasTheme::light();
        let overlay = Overlay {
            selected: Some(a),
            preview: None,
        };
        let mut surface = RecordingSurface::new(800.0, 600.0);
        paint_scene(&mut surface, &scene, &Viewport::default(), Point::ZERO, &overlay, &theme);
        let highlights = surface.count(
            |op| matches!(op, DrawOp::StrokeRect(_, s) if s.color == theme.selection),
        );
        assert_eq!(highlights, 1);
    }

    #[test]
    fn offscreen_nodes_are_culled() {
        let (scene, _, _) = two_node_scene();
        let mut surface = RecordingSurface::new(200.0, 200.0);
        paint_scene(
            &mut surface,
            &scene,
            &Viewport::default(),
            Point::ZERO,
            &Overlay::default(),
            &CanvasTheme::light(),
        );
        let texts = surface.texts();
        assert!(texts.contains(&"A".to_string()));
        assert!(!texts.contains(&"B".to_string()));
    }

    #[test]
    fn zoom_and_pan_move_geometry() {
        let (scene, _, _) = two_node_scene();
        let vp = Viewport::new(2.0, Point::new(10.0, 20.0));
        let mut surface = RecordingSurface::new(2000.0, 2000.0);
        paint_scene(
            &mut surface,
            &scene,
            &vp,
            Point::ZERO,
            &Overlay::default(),
            &CanvasTheme::light(),
        );
        let first_fill = surface.ops.iter().find_map(|op| match op {
            DrawOp::FillRect(r, _) => Some(*r),
            _ => None,
        });
        assert_eq!(first_fill, Some(Rect::new(10.0, 20.0, 200.0, 100.0)));
    }
}
