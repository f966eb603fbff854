//! Tool system and interaction state machine.
//!
//! The `InteractionController` translates input events into
//! `CanvasMutation`s that are applied by the `CanvasSession`. It reads the
//! scene and viewport to hit-test and convert coordinates, but never mutates
//! them itself.

use crate::input::InputEvent;
use crate::session::CanvasMutation;
use mg_core::id::NodeId;
use mg_core::model::*;
use mg_core::scene::SceneModel;
use mg_core::viewport::{Viewport, screen_to_world};
use mg_render::hit::hit_test;
use mg_render::paint::{ConnectPreview, Overlay};

/// The active tool determines how pointer-down is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Add,
    Connect,
    Pan,
}

impl ToolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Add => "add",
            ToolKind::Connect => "connect",
            ToolKind::Pan => "pan",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "select" => Some(ToolKind::Select),
            "add" => Some(ToolKind::Add),
            "connect" => Some(ToolKind::Connect),
            "pan" => Some(ToolKind::Pan),
            _ => None,
        }
    }
}

/// The gesture in progress. Every gesture ends in `Idle` on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging `id`; `grab_offset` is the world pointer minus the node's
    /// position at pointer-down.
    DraggingNode { id: NodeId, grab_offset: Point },
    /// A connect gesture started on `id`.
    ConnectingFrom { id: NodeId },
    /// Panning; `last_screen` is the previous pointer position.
    PanningCanvas { last_screen: Point },
}

/// What the controller reads from the session for one event.
#[derive(Clone, Copy)]
pub struct CanvasContext<'a> {
    pub scene: &'a SceneModel,
    pub viewport: &'a Viewport,
    /// Top-left of the drawing surface in pointer space.
    pub origin: Point,
}

impl CanvasContext<'_> {
    fn to_world(&self, screen: Point) -> Point {
        screen_to_world(screen, self.origin, self.viewport)
    }

    fn hit(&self, world: Point) -> Option<&Node> {
        hit_test(world, self.scene.nodes_in_z_order())
    }
}

pub struct InteractionController {
    tool: ToolKind,
    state: InteractionState,
    selected: Option<NodeId>,
    /// Last pointer position in world space (drives the connect preview).
    pointer: Point,
    /// Node whose edit surface should open, consumed by the session.
    edit_request: Option<NodeId>,
    /// Kind given to nodes created with the Add tool.
    pub add_kind: NodeKind,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            tool: ToolKind::Select,
            state: InteractionState::Idle,
            selected: None,
            pointer: Point::ZERO,
            edit_request: None,
            add_kind: NodeKind::default(),
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Switch tools. An in-progress gesture is cancelled without mutations.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool == tool {
            return;
        }
        self.cancel();
        log::debug!("tool: {} -> {}", self.tool.as_str(), tool.as_str());
        self.tool = tool;
    }

    /// Abort the current gesture and return to `Idle`.
    ///
    /// Returns `true` if a gesture was actually cancelled. Moves already
    /// applied by a drag are kept.
    pub fn cancel(&mut self) -> bool {
        if self.state == InteractionState::Idle {
            return false;
        }
        log::debug!("gesture cancelled: {:?}", self.state);
        self.state = InteractionState::Idle;
        true
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    /// Drop every reference to a node that no longer exists.
    pub fn forget(&mut self, id: NodeId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.edit_request == Some(id) {
            self.edit_request = None;
        }
        let involved = match self.state {
            InteractionState::DraggingNode { id: n, .. }
            | InteractionState::ConnectingFrom { id: n } => n == id,
            _ => false,
        };
        if involved {
            self.state = InteractionState::Idle;
        }
    }

    /// Take the pending edit-surface request, if any.
    pub fn take_edit_request(&mut self) -> Option<NodeId> {
        self.edit_request.take()
    }

    /// Transient decorations for the renderer.
    pub fn overlay(&self) -> Overlay {
        let preview = match self.state {
            InteractionState::ConnectingFrom { id } => Some(ConnectPreview {
                source: id,
                pointer: self.pointer,
            }),
            _ => None,
        };
        Overlay {
            selected: self.selected,
            preview,
        }
    }

    /// Handle a pointer event, returning zero or more mutations.
    /// Key events are ignored here; the session resolves shortcuts.
    pub fn handle(&mut self, event: &InputEvent, ctx: CanvasContext<'_>) -> Vec<CanvasMutation> {
        let Some(screen) = event.position() else {
            return vec![];
        };
        let world = ctx.to_world(screen);
        self.pointer = world;
        log::trace!("{event:?} -> world ({:.1}, {:.1})", world.x, world.y);

        match event {
            InputEvent::PointerDown { .. } => self.pointer_down(screen, world, ctx),
            InputEvent::PointerMove { .. } => self.pointer_move(screen, world, ctx),
            InputEvent::PointerUp { .. } => self.pointer_up(world, ctx),
            InputEvent::DoubleClick { .. } => {
                if let Some(node) = ctx.hit(world) {
                    self.edit_request = Some(node.id);
                }
                vec![]
            }
            InputEvent::Key { .. } => vec![],
        }
    }

    // ─── Pointer down ────────────────────────────────────────────────────

    fn pointer_down(
        &mut self,
        screen: Point,
        world: Point,
        ctx: CanvasContext<'_>,
    ) -> Vec<CanvasMutation> {
        if self.state != InteractionState::Idle {
            // A previous gesture never saw its pointer-up (e.g. released
            // outside the canvas). Drop it before starting a new one.
            self.cancel();
        }

        match self.tool {
            ToolKind::Add => {
                let size = Size::default();
                let node = NodeSpec::new(self.add_kind)
                    .label("New node")
                    .at(world.x - size.width / 2.0, world.y - size.height / 2.0)
                    .into_node(NodeId::generate());
                self.selected = Some(node.id);
                self.edit_request = Some(node.id);
                vec![CanvasMutation::AddNode {
                    node: Box::new(node),
                }]
            }
            ToolKind::Select => match ctx.hit(world) {
                Some(node) => {
                    self.selected = Some(node.id);
                    self.state = InteractionState::DraggingNode {
                        id: node.id,
                        grab_offset: world - node.position,
                    };
                    vec![CanvasMutation::BringToFront { id: node.id }]
                }
                None => {
                    self.selected = None;
                    vec![]
                }
            },
            ToolKind::Connect => {
                if let Some(node) = ctx.hit(world) {
                    self.state = InteractionState::ConnectingFrom { id: node.id };
                }
                vec![]
            }
            ToolKind::Pan => {
                self.state = InteractionState::PanningCanvas {
                    last_screen: screen,
                };
                vec![]
            }
        }
    }

    // ─── Pointer move ────────────────────────────────────────────────────

    fn pointer_move(
        &mut self,
        screen: Point,
        world: Point,
        ctx: CanvasContext<'_>,
    ) -> Vec<CanvasMutation> {
        match self.state {
            InteractionState::DraggingNode { id, grab_offset } => vec![CanvasMutation::MoveNode {
                id,
                position: world - grab_offset,
            }],
            InteractionState::PanningCanvas { last_screen } => {
                let zoom = ctx.viewport.zoom();
                self.state = InteractionState::PanningCanvas {
                    last_screen: screen,
                };
                vec![CanvasMutation::PanBy {
                    dx: (screen.x - last_screen.x) / zoom,
                    dy: (screen.y - last_screen.y) / zoom,
                }]
            }
            // Preview follows `self.pointer`, already updated.
            InteractionState::ConnectingFrom { .. } | InteractionState::Idle => vec![],
        }
    }

    // ─── Pointer up ──────────────────────────────────────────────────────

    fn pointer_up(&mut self, world: Point, ctx: CanvasContext<'_>) -> Vec<CanvasMutation> {
        let state = std::mem::take(&mut self.state);
        match state {
            InteractionState::ConnectingFrom { id: source } => match ctx.hit(world) {
                Some(target) if target.id != source => vec![CanvasMutation::AddEdge {
                    source,
                    target: target.id,
                    kind: "default".into(),
                }],
                _ => {
                    log::debug!("connect from {source} released over nothing");
                    vec![]
                }
            },
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scene_with_nodes(positions: &[(f64, f64)]) -> (SceneModel, Vec<NodeId>) {
        let mut scene = SceneModel::new();
        let ids = positions
            .iter()
            .map(|&(x, y)| scene.add_node(NodeSpec::new(NodeKind::Memory).at(x, y)).id)
            .collect();
        (scene, ids)
    }

    fn ctx<'a>(scene: &'a SceneModel, viewport: &'a Viewport) -> CanvasContext<'a> {
        CanvasContext {
            scene,
            viewport,
            origin: Point::ZERO,
        }
    }

    #[test]
    fn drag_moves_by_grab_offset() {
        let (scene, ids) = scene_with_nodes(&[(100.0, 100.0)]);
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();

        ctl.handle(&InputEvent::pointer_down(110.0, 110.0), ctx(&scene, &vp));
        assert_eq!(
            ctl.state(),
            InteractionState::DraggingNode {
                id: ids[0],
                grab_offset: Point::new(10.0, 10.0)
            }
        );
        assert_eq!(ctl.selected(), Some(ids[0]));

        let muts = ctl.handle(&InputEvent::pointer_move(150.0, 160.0), ctx(&scene, &vp));
        assert_eq!(
            muts,
            vec![CanvasMutation::MoveNode {
                id: ids[0],
                position: Point::new(140.0, 150.0)
            }]
        );

        ctl.handle(&InputEvent::pointer_up(150.0, 160.0), ctx(&scene, &vp));
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn select_miss_clears_selection() {
        let (scene, ids) = scene_with_nodes(&[(0.0, 0.0)]);
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.select(Some(ids[0]));
        let muts = ctl.handle(&InputEvent::pointer_down(900.0, 900.0), ctx(&scene, &vp));
        assert!(muts.is_empty());
        assert_eq!(ctl.selected(), None);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn add_centres_node_and_requests_edit() {
        let scene = SceneModel::new();
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.set_tool(ToolKind::Add);

        let muts = ctl.handle(&InputEvent::pointer_down(200.0, 100.0), ctx(&scene, &vp));
        let [CanvasMutation::AddNode { node }] = muts.as_slice() else {
            panic!("expected one AddNode, got {muts:?}");
        };
        assert_eq!(node.position, Point::new(120.0, 60.0));
        assert_eq!(node.center(), Point::new(200.0, 100.0));
        assert_eq!(ctl.take_edit_request(), Some(node.id));
        assert_eq!(ctl.take_edit_request(), None);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn connect_to_other_node_adds_edge() {
        let (scene, ids) = scene_with_nodes(&[(0.0, 0.0), (400.0, 0.0)]);
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.set_tool(ToolKind::Connect);

        ctl.handle(&InputEvent::pointer_down(10.0, 10.0), ctx(&scene, &vp));
        assert_eq!(ctl.state(), InteractionState::ConnectingFrom { id: ids[0] });

        ctl.handle(&InputEvent::pointer_move(300.0, 40.0), ctx(&scene, &vp));
        assert_eq!(
            ctl.overlay().preview,
            Some(ConnectPreview {
                source: ids[0],
                pointer: Point::new(300.0, 40.0)
            })
        );

        let muts = ctl.handle(&InputEvent::pointer_up(410.0, 10.0), ctx(&scene, &vp));
        assert_eq!(
            muts,
            vec![CanvasMutation::AddEdge {
                source: ids[0],
                target: ids[1],
                kind: "default".into()
            }]
        );
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert_eq!(ctl.overlay().preview, None);
    }

    #[test]
    fn connect_released_on_empty_canvas_is_noop() {
        let (scene, _) = scene_with_nodes(&[(0.0, 0.0)]);
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.set_tool(ToolKind::Connect);

        ctl.handle(&InputEvent::pointer_down(10.0, 10.0), ctx(&scene, &vp));
        let muts = ctl.handle(&InputEvent::pointer_up(700.0, 700.0), ctx(&scene, &vp));
        assert!(muts.is_empty());
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn connect_released_on_source_is_noop() {
        let (scene, _) = scene_with_nodes(&[(0.0, 0.0)]);
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.set_tool(ToolKind::Connect);

        ctl.handle(&InputEvent::pointer_down(10.0, 10.0), ctx(&scene, &vp));
        let muts = ctl.handle(&InputEvent::pointer_up(20.0, 20.0), ctx(&scene, &vp));
        assert!(muts.is_empty());
    }

    #[test]
    fn connect_on_empty_canvas_stays_idle() {
        let scene = SceneModel::new();
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.set_tool(ToolKind::Connect);
        ctl.handle(&InputEvent::pointer_down(10.0, 10.0), ctx(&scene, &vp));
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn pan_is_normalized_by_zoom() {
        let scene = SceneModel::new();
        let vp = Viewport::new(2.0, Point::ZERO);
        let mut ctl = InteractionController::new();
        ctl.set_tool(ToolKind::Pan);

        ctl.handle(&InputEvent::pointer_down(100.0, 100.0), ctx(&scene, &vp));
        let muts = ctl.handle(&InputEvent::pointer_move(140.0, 80.0), ctx(&scene, &vp));
        assert_eq!(muts, vec![CanvasMutation::PanBy { dx: 20.0, dy: -10.0 }]);
        assert_eq!(
            ctl.state(),
            InteractionState::PanningCanvas {
                last_screen: Point::new(140.0, 80.0)
            }
        );
        ctl.handle(&InputEvent::pointer_up(140.0, 80.0), ctx(&scene, &vp));
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn double_click_requests_edit_with_any_tool() {
        let (scene, ids) = scene_with_nodes(&[(0.0, 0.0)]);
        let vp = Viewport::default();
        for tool in [ToolKind::Select, ToolKind::Add, ToolKind::Connect, ToolKind::Pan] {
            let mut ctl = InteractionController::new();
            ctl.set_tool(tool);
            ctl.handle(&InputEvent::double_click(5.0, 5.0), ctx(&scene, &vp));
            assert_eq!(ctl.take_edit_request(), Some(ids[0]), "tool {tool:?}");
        }
    }

    #[test]
    fn switching_tool_cancels_gesture() {
        let (scene, _) = scene_with_nodes(&[(0.0, 0.0), (400.0, 0.0)]);
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.set_tool(ToolKind::Connect);
        ctl.handle(&InputEvent::pointer_down(10.0, 10.0), ctx(&scene, &vp));

        ctl.set_tool(ToolKind::Select);
        assert_eq!(ctl.state(), InteractionState::Idle);
        let muts = ctl.handle(&InputEvent::pointer_up(410.0, 10.0), ctx(&scene, &vp));
        assert!(muts.is_empty());
    }

    #[test]
    fn escape_cancel_drops_connect_gesture() {
        let (scene, _) = scene_with_nodes(&[(0.0, 0.0), (400.0, 0.0)]);
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.set_tool(ToolKind::Connect);
        ctl.handle(&InputEvent::pointer_down(10.0, 10.0), ctx(&scene, &vp));
        assert!(ctl.cancel());
        assert!(!ctl.cancel());
        let muts = ctl.handle(&InputEvent::pointer_up(410.0, 10.0), ctx(&scene, &vp));
        assert!(muts.is_empty());
    }

    #[test]
    fn hit_uses_viewport_transform() {
        let (scene, ids) = scene_with_nodes(&[(100.0, 100.0)]);
        // zoom 2, pan (50, 0), canvas at (10, 20) on the page:
        // world (110, 110) <- screen (10 + 50 + 220, 20 + 220).
        let vp = Viewport::new(2.0, Point::new(50.0, 0.0));
        let context = CanvasContext {
            scene: &scene,
            viewport: &vp,
            origin: Point::new(10.0, 20.0),
        };
        let mut ctl = InteractionController::new();
        ctl.handle(&InputEvent::pointer_down(280.0, 240.0), context);
        assert_eq!(
            ctl.state(),
            InteractionState::DraggingNode {
                id: ids[0],
                grab_offset: Point::new(10.0, 10.0)
            }
        );
    }

    #[test]
    fn forget_clears_references() {
        let (scene, ids) = scene_with_nodes(&[(0.0, 0.0)]);
        let vp = Viewport::default();
        let mut ctl = InteractionController::new();
        ctl.handle(&InputEvent::pointer_down(5.0, 5.0), ctx(&scene, &vp));
        ctl.forget(ids[0]);
        assert_eq!(ctl.selected(), None);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn tool_names_parse() {
        for tool in [ToolKind::Select, ToolKind::Add, ToolKind::Connect, ToolKind::Pan] {
            assert_eq!(ToolKind::parse(tool.as_str()), Some(tool));
        }
        assert_eq!(ToolKind::parse(" PAN "), Some(ToolKind::Pan));
        assert_eq!(ToolKind::parse("lasso"), None);
    }
}
