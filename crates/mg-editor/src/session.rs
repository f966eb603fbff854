//! Canvas session: the owner of scene, viewport and interaction state.
//!
//! The session is the single place where mutations land:
//!
//! - **Pointer input** goes through the `InteractionController`, which
//!   returns `CanvasMutation`s; the session applies them to the
//!   `SceneModel` and `Viewport`.
//! - **Keyboard input** is resolved by the `ShortcutMap` and dispatched to
//!   the session's own commands (zoom, delete, save, cancel).
//! - **Edit surface**: double-click or node creation opens an `EditDraft`
//!   exposing `{kind, label, content}`; confirming writes it back with
//!   `SceneModel::update_node`.
//! - **Persistence** is delegated to a caller-supplied `SceneSink`, which
//!   receives `Snapshot` values and delete requests.

use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{CanvasContext, InteractionController, InteractionState, ToolKind};
use mg_core::config::{CanvasConfig, GraphConfig};
use mg_core::entity::Entity;
use mg_core::error::SceneError;
use mg_core::id::{EdgeId, NodeId};
use mg_core::model::*;
use mg_core::scene::SceneModel;
use mg_core::seed::build_scene;
use mg_core::snapshot::{self, Snapshot};
use mg_core::viewport::Viewport;
use mg_render::paint::{Overlay, paint_scene};
use mg_render::style::CanvasTheme;
use mg_render::surface::Surface;

/// A change requested by the interaction layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasMutation {
    AddNode {
        node: Box<Node>,
    },
    MoveNode {
        id: NodeId,
        position: Point,
    },
    /// Remove a node and every edge touching it.
    RemoveNode {
        id: NodeId,
    },
    AddEdge {
        source: NodeId,
        target: NodeId,
        kind: String,
    },
    /// Remove a single edge; its endpoints stay.
    RemoveEdge {
        id: EdgeId,
    },
    BringToFront {
        id: NodeId,
    },
    /// Shift the pan by a delta already normalized by zoom.
    PanBy {
        dx: f64,
        dy: f64,
    },
    SetViewport(Viewport),
}

/// Receives the session's outbound requests.
pub trait SceneSink {
    /// Persist a snapshot. The session does not wait for completion.
    fn save(&mut self, snapshot: Snapshot);

    /// The user asked to discard the current scene.
    fn delete(&mut self);
}

/// The editable fields of a node, held while the edit surface is open.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub content: String,
}

impl EditDraft {
    fn of(node: &Node) -> Self {
        Self {
            id: node.id,
            kind: node.kind,
            label: node.label.clone(),
            content: node.content.clone(),
        }
    }

    /// The node being edited.
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn into_patch(self) -> NodePatch {
        NodePatch {
            kind: Some(self.kind),
            label: Some(self.label),
            content: Some(self.content),
            ..Default::default()
        }
    }
}

pub struct CanvasSession {
    /// The scene (single source of truth for nodes and edges).
    pub scene: SceneModel,

    pub viewport: Viewport,

    /// Top-left of the drawing surface in pointer space.
    pub origin: Point,

    /// Size of the drawing surface, used by zoom-to-fit.
    pub surface_size: Size,

    pub config: CanvasConfig,

    controller: InteractionController,
    edit: Option<EditDraft>,
    sink: Option<Box<dyn SceneSink>>,

    /// Set when the scene changes; cleared by `save`.
    dirty: bool,
}

impl CanvasSession {
    pub fn new(scene: SceneModel, viewport: Viewport, config: CanvasConfig) -> Self {
        Self {
            scene,
            viewport,
            origin: Point::ZERO,
            surface_size: Size::new(800.0, 600.0),
            config,
            controller: InteractionController::new(),
            edit: None,
            sink: None,
            dirty: false,
        }
    }

    /// Seed a session from caller entities: grid-placed nodes connected by
    /// tag similarity.
    pub fn from_entities(entities: &[Entity], graph: &GraphConfig, config: CanvasConfig) -> Self {
        let (scene, _) = build_scene(entities, graph);
        Self::new(scene, Viewport::default(), config)
    }

    /// Resume a saved snapshot, including its viewport.
    pub fn from_snapshot(snapshot: &Snapshot, config: CanvasConfig) -> Self {
        let (scene, viewport) = snapshot::deserialize(snapshot);
        Self::new(scene, viewport, config)
    }

    pub fn set_sink(&mut self, sink: Box<dyn SceneSink>) {
        self.sink = Some(sink);
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn tool(&self) -> ToolKind {
        self.controller.tool()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.controller.set_tool(tool);
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.controller.selected()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route one input event. Returns `true` if the canvas needs a repaint.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Key { key, modifiers } = event {
            return match self.resolve_key(key, *modifiers) {
                Some(action) => self.run_shortcut(action),
                None => false,
            };
        }

        let before = self.controller.overlay();
        let ctx = CanvasContext {
            scene: &self.scene,
            viewport: &self.viewport,
            origin: self.origin,
        };
        let mutations = self.controller.handle(event, ctx);
        let mut changed = false;
        for mutation in mutations {
            changed |= self.apply(mutation);
        }

        if let Some(id) = self.controller.take_edit_request() {
            changed |= self.open_edit(id);
        }
        changed || self.controller.overlay() != before
    }

    /// Resolve a key to the action it triggers in the current state.
    /// While the edit surface is open, plain keys are typing and only
    /// Escape and ⌘/Ctrl combos resolve.
    pub fn resolve_key(&self, key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        ShortcutMap::resolve(key, modifiers).filter(|action| {
            self.edit.is_none() || modifiers.command() || *action == ShortcutAction::Cancel
        })
    }

    /// Run a shortcut action. Returns `true` if the canvas needs a repaint.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        log::debug!("shortcut: {action:?}");
        match action {
            ShortcutAction::Tool(_) | ShortcutAction::Delete if self.edit.is_some() => {
                log::debug!("{action:?} ignored while editing");
                false
            }
            ShortcutAction::Tool(tool) => {
                self.set_tool(tool);
                true
            }
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Cancel => self.cancel(),
            ShortcutAction::Save => {
                self.save();
                false
            }
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::ZoomReset => self.apply(CanvasMutation::SetViewport(Viewport::reset())),
            ShortcutAction::ZoomToFit => self.zoom_to_fit(),
        }
    }

    /// Escape: close the edit surface, else abort the gesture, else deselect.
    pub fn cancel(&mut self) -> bool {
        if self.edit.is_some() {
            self.cancel_edit();
            return true;
        }
        if self.controller.cancel() {
            return true;
        }
        if self.controller.selected().is_some() {
            self.controller.select(None);
            return true;
        }
        false
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply one mutation. Returns `true` if anything changed; requests that
    /// break scene invariants are logged no-ops.
    pub fn apply(&mut self, mutation: CanvasMutation) -> bool {
        let changed = match mutation {
            CanvasMutation::AddNode { node } => self.scene.insert_node(*node),
            CanvasMutation::MoveNode { id, position } => {
                match self.scene.update_node(id, NodePatch::position(position)) {
                    Ok(_) => true,
                    Err(e) => {
                        log::debug!("move ignored: {e}");
                        false
                    }
                }
            }
            CanvasMutation::RemoveNode { id } => {
                let removed = self.scene.remove_node(id).is_some();
                self.controller.forget(id);
                if self.edit.as_ref().is_some_and(|d| d.id == id) {
                    self.edit = None;
                }
                removed
            }
            CanvasMutation::AddEdge {
                source,
                target,
                kind,
            } => self.scene.add_edge(source, target, &kind).is_some(),
            CanvasMutation::RemoveEdge { id } => self.scene.remove_edge(id).is_some(),
            CanvasMutation::BringToFront { id } => self.scene.bring_to_front(id),
            CanvasMutation::PanBy { dx, dy } => {
                self.viewport = self.viewport.pan_by(dx, dy);
                return true;
            }
            CanvasMutation::SetViewport(viewport) => {
                let changed = self.viewport != viewport;
                self.viewport = viewport;
                return changed;
            }
        };
        self.dirty |= changed;
        changed
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.controller.selected() {
            Some(id) => self.apply(CanvasMutation::RemoveNode { id }),
            None => false,
        }
    }

    /// Remove one edge by id. Returns `false` if it does not exist.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        self.apply(CanvasMutation::RemoveEdge { id })
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> bool {
        let vp = self.viewport.zoom_by(self.config.zoom_step);
        self.apply(CanvasMutation::SetViewport(vp))
    }

    pub fn zoom_out(&mut self) -> bool {
        let vp = self.viewport.zoom_by(-self.config.zoom_step);
        self.apply(CanvasMutation::SetViewport(vp))
    }

    /// Frame all nodes in the surface. No-op on an empty scene.
    pub fn zoom_to_fit(&mut self) -> bool {
        let Some(bounds) = self.scene.content_bounds() else {
            return false;
        };
        let vp = Viewport::fit_to_bounds(bounds, self.surface_size, self.config.fit_padding);
        self.apply(CanvasMutation::SetViewport(vp))
    }

    // ─── Edit surface ────────────────────────────────────────────────────

    /// Open the edit surface for `id`. Returns `false` if the node is absent.
    pub fn open_edit(&mut self, id: NodeId) -> bool {
        match self.scene.node(id) {
            Some(node) => {
                self.edit = Some(EditDraft::of(node));
                true
            }
            None => false,
        }
    }

    pub fn edit_draft(&self) -> Option<&EditDraft> {
        self.edit.as_ref()
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut EditDraft> {
        self.edit.as_mut()
    }

    /// Write the open draft back to its node and close the surface.
    ///
    /// Returns `Ok(None)` when no draft was open. If the node was removed
    /// meanwhile the draft is discarded and `NodeNotFound` is returned.
    pub fn confirm_edit(&mut self) -> Result<Option<&Node>, SceneError> {
        let Some(draft) = self.edit.take() else {
            return Ok(None);
        };
        let id = draft.id;
        match self.scene.update_node(id, draft.into_patch()).map(|_| ()) {
            Ok(()) => {
                self.dirty = true;
                Ok(self.scene.node(id))
            }
            Err(e) => {
                self.controller.forget(id);
                Err(e)
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    // ─── Output ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        snapshot::serialize(&self.scene, &self.viewport)
    }

    /// Hand a snapshot to the sink (if any) and return it.
    pub fn save(&mut self) -> Snapshot {
        let snapshot = self.snapshot();
        match self.sink.as_mut() {
            Some(sink) => {
                log::info!(
                    "saving scene: {} nodes, {} edges",
                    snapshot.node_count(),
                    snapshot.edge_count()
                );
                sink.save(snapshot.clone());
                self.dirty = false;
            }
            None => log::debug!("save requested without a sink"),
        }
        snapshot
    }

    /// Ask the sink to discard this scene. The session itself is unchanged.
    pub fn request_delete(&mut self) {
        self.controller.cancel();
        self.edit = None;
        match self.sink.as_mut() {
            Some(sink) => sink.delete(),
            None => log::debug!("delete requested without a sink"),
        }
    }

    // ─── Painting ────────────────────────────────────────────────────────

    pub fn overlay(&self) -> Overlay {
        self.controller.overlay()
    }

    pub fn paint(&self, surface: &mut dyn Surface, theme: &CanvasTheme) {
        // Surfaces draw in local pixels; the origin only matters for input.
        paint_scene(
            surface,
            &self.scene,
            &self.viewport,
            Point::ZERO,
            &self.overlay(),
            theme,
        );
    }
}
