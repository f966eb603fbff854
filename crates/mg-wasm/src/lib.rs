//! WASM bridge for MindGraph: exposes the graph canvas to the dashboard.
//!
//! Compiled via `wasm-pack build --target web`. All data crosses the
//! boundary as JSON strings; save and delete requests are forwarded to
//! JavaScript callbacks registered by the host.

mod canvas2d;

use canvas2d::Canvas2dSurface;
use mg_core::entity::Entity;
use mg_core::model::NodeKind;
use mg_core::seed::build_scene;
use mg_core::snapshot::{self, Snapshot};
use mg_core::{CanvasConfig, EdgeId, GraphConfig, Point, Size, Viewport};
use mg_editor::input::{InputEvent, Modifiers};
use mg_editor::session::{CanvasSession, SceneSink};
use mg_editor::shortcuts::ShortcutAction;
use mg_editor::tools::ToolKind;
use mg_render::style::CanvasTheme;
use mg_render::surface::SvgSurface;
use mg_render::thumbnail::paint_thumbnail;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// Forwards session output to JavaScript callbacks.
struct JsSink {
    on_save: Option<js_sys::Function>,
    on_delete: Option<js_sys::Function>,
}

impl SceneSink for JsSink {
    fn save(&mut self, snapshot: Snapshot) {
        let Some(callback) = &self.on_save else {
            return;
        };
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("save: snapshot encoding failed: {e}");
                return;
            }
        };
        let value = js_sys::JSON::parse(&json).unwrap_or_else(|_| JsValue::from_str(&json));
        if let Err(e) = callback.call1(&JsValue::NULL, &value) {
            log::warn!("save callback threw: {e:?}");
        }
    }

    fn delete(&mut self) {
        if let Some(callback) = &self.on_delete
            && let Err(e) = callback.call0(&JsValue::NULL)
        {
            log::warn!("delete callback threw: {e:?}");
        }
    }
}

/// The main WASM-facing canvas controller.
///
/// Holds the canvas session plus host-side settings. All interaction from
/// the dashboard goes through this struct.
#[wasm_bindgen]
pub struct MgCanvas {
    session: CanvasSession,
    graph_config: GraphConfig,
    on_save: Option<js_sys::Function>,
    on_delete: Option<js_sys::Function>,
    width: f64,
    height: f64,
    /// Dark mode flag: `false` = light (default), `true` = dark.
    dark_mode: bool,
}

#[wasm_bindgen]
impl MgCanvas {
    /// Create an empty canvas of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();

        let mut session = CanvasSession::new(
            Default::default(),
            Viewport::default(),
            CanvasConfig::default(),
        );
        session.surface_size = Size::new(width, height);
        Self {
            session,
            graph_config: GraphConfig::default(),
            on_save: None,
            on_delete: None,
            width,
            height,
            dark_mode: false,
        }
    }

    // ─── Loading ─────────────────────────────────────────────────────────

    /// Replace the graph-building settings (JSON, camelCase, all optional).
    /// Returns `false` and keeps the old settings on a parse error.
    pub fn set_graph_config(&mut self, json: &str) -> bool {
        match serde_json::from_str(json) {
            Ok(config) => {
                self.graph_config = config;
                true
            }
            Err(e) => {
                log::warn!("graph config rejected: {e}");
                false
            }
        }
    }

    /// Replace the canvas settings (JSON, camelCase, all optional).
    pub fn set_canvas_config(&mut self, json: &str) -> bool {
        match serde_json::from_str(json) {
            Ok(config) => {
                self.session.config = config;
                true
            }
            Err(e) => {
                log::warn!("canvas config rejected: {e}");
                false
            }
        }
    }

    /// Seed the scene from a JSON array of memories / knowledge items.
    /// Returns `false` (scene untouched) if the JSON is not an entity array.
    pub fn load_entities(&mut self, json: &str) -> bool {
        let entities: Vec<Entity> = match serde_json::from_str(json) {
            Ok(entities) => entities,
            Err(e) => {
                log::warn!("entities rejected: {e}");
                return false;
            }
        };
        let config = self.session.config.clone();
        self.replace_session(CanvasSession::from_entities(
            &entities,
            &self.graph_config,
            config,
        ));
        true
    }

    /// Resume a saved snapshot (JSON). Returns `false` on a parse error.
    pub fn load_snapshot(&mut self, json: &str) -> bool {
        match Snapshot::from_json(json) {
            Ok(snapshot) => {
                let config = self.session.config.clone();
                self.replace_session(CanvasSession::from_snapshot(&snapshot, config));
                true
            }
            Err(e) => {
                log::warn!("snapshot rejected: {e}");
                false
            }
        }
    }

    /// Current scene as snapshot JSON (empty string if encoding fails).
    pub fn snapshot_json(&self) -> String {
        self.session.snapshot().to_json().unwrap_or_default()
    }

    // ─── Callbacks ───────────────────────────────────────────────────────

    /// Register `fn(snapshot)`, called on save.
    pub fn set_save_callback(&mut self, callback: js_sys::Function) {
        self.on_save = Some(callback);
        self.install_sink();
    }

    /// Register `fn()`, called when the user deletes the scene.
    pub fn set_delete_callback(&mut self, callback: js_sys::Function) {
        self.on_delete = Some(callback);
        self.install_sink();
    }

    pub fn save(&mut self) {
        self.session.save();
    }

    pub fn request_delete(&mut self) {
        self.session.request_delete();
    }

    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let mut surface = Canvas2dSurface::new(ctx, self.width, self.height);
        self.session.paint(&mut surface, &self.theme());
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.session.surface_size = Size::new(width, height);
    }

    /// Canvas element's top-left in pointer coordinates.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.session.origin = Point::new(x, y);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle pointer down. Returns `true` if a repaint is needed.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.session.handle_event(&InputEvent::pointer_down(x, y))
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.session.handle_event(&InputEvent::pointer_move(x, y))
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.session.handle_event(&InputEvent::pointer_up(x, y))
    }

    pub fn handle_double_click(&mut self, x: f64, y: f64) -> bool {
        self.session.handle_event(&InputEvent::double_click(x, y))
    }

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool,"action":"<action>","tool":"<tool>"}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let modifiers = Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        };
        let (changed, action) = match self.session.resolve_key(key, modifiers) {
            Some(action) => (self.session.run_shortcut(action), action_name(action)),
            None => (false, "none"),
        };
        serde_json::json!({
            "changed": changed,
            "action": action,
            "tool": self.session.tool().as_str(),
        })
        .to_string()
    }

    /// Switch tool by name (`select`, `add`, `connect`, `pan`).
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::parse(name) {
            Some(tool) => {
                self.session.set_tool(tool);
                true
            }
            None => false,
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.session.tool().as_str().to_string()
    }

    /// Selected node id, or an empty string.
    pub fn get_selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    /// Remove one edge by the id found in `snapshot_json`.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        self.session.remove_edge(EdgeId::intern(id))
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> bool {
        self.session.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.session.zoom_out()
    }

    pub fn zoom_reset(&mut self) -> bool {
        self.session.run_shortcut(ShortcutAction::ZoomReset)
    }

    pub fn zoom_to_fit(&mut self) -> bool {
        self.session.zoom_to_fit()
    }

    pub fn get_zoom(&self) -> f64 {
        self.session.viewport.zoom()
    }

    // ─── Edit surface ────────────────────────────────────────────────────

    /// The open edit draft as `{"id","kind","label","content"}`, or an
    /// empty string when the edit surface is closed.
    pub fn get_edit_draft(&self) -> String {
        match self.session.edit_draft() {
            Some(draft) => serde_json::json!({
                "id": draft.id().as_str(),
                "kind": draft.kind.as_str(),
                "label": draft.label,
                "content": draft.content,
            })
            .to_string(),
            None => String::new(),
        }
    }

    /// Update the open draft. Returns `false` if no draft is open or the
    /// kind name is unknown.
    pub fn update_edit_draft(&mut self, kind: &str, label: &str, content: &str) -> bool {
        let Some(kind) = NodeKind::parse(kind) else {
            return false;
        };
        match self.session.edit_draft_mut() {
            Some(draft) => {
                draft.kind = kind;
                draft.label = label.to_string();
                draft.content = content.to_string();
                true
            }
            None => false,
        }
    }

    /// Write the draft back. Returns `false` if nothing was open or the
    /// node has been removed meanwhile.
    pub fn confirm_edit(&mut self) -> bool {
        match self.session.confirm_edit() {
            Ok(node) => node.is_some(),
            Err(e) => {
                log::debug!("confirm_edit: {e}");
                false
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel_edit();
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.session.scene.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.session.scene.edge_count()
    }
}

impl MgCanvas {
    fn theme(&self) -> CanvasTheme {
        if self.dark_mode {
            CanvasTheme::dark()
        } else {
            CanvasTheme::light()
        }
    }

    /// Swap in a new session, keeping host wiring and surface geometry.
    fn replace_session(&mut self, mut session: CanvasSession) {
        session.origin = self.session.origin;
        session.surface_size = self.session.surface_size;
        self.session = session;
        self.install_sink();
    }

    fn install_sink(&mut self) {
        if self.on_save.is_none() && self.on_delete.is_none() {
            return;
        }
        self.session.set_sink(Box::new(JsSink {
            on_save: self.on_save.clone(),
            on_delete: self.on_delete.clone(),
        }));
    }
}

fn action_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Tool(_) => "tool",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Cancel => "cancel",
        ShortcutAction::Save => "save",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ZoomReset => "zoomReset",
        ShortcutAction::ZoomToFit => "zoomToFit",
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("MindGraph WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone helpers (no canvas session needed) ───────────────────────

/// Build a snapshot from entity JSON without opening a canvas.
/// Returns the snapshot JSON, or an empty string on a parse error.
#[wasm_bindgen]
pub fn seed_snapshot(entities_json: &str) -> String {
    let entities: Vec<Entity> = match serde_json::from_str(entities_json) {
        Ok(entities) => entities,
        Err(e) => {
            log::warn!("entities rejected: {e}");
            return String::new();
        }
    };
    let (scene, _) = build_scene(&entities, &GraphConfig::default());
    snapshot::serialize(&scene, &Viewport::default())
        .to_json()
        .unwrap_or_default()
}

/// Paint a read-only thumbnail of a snapshot. Returns `false` if the
/// snapshot JSON does not parse.
#[wasm_bindgen]
pub fn render_thumbnail(
    ctx: &CanvasRenderingContext2d,
    snapshot_json: &str,
    is_dark: bool,
) -> bool {
    let Ok(snapshot) = Snapshot::from_json(snapshot_json) else {
        return false;
    };
    let config = CanvasConfig::default();
    let theme = if is_dark {
        CanvasTheme::dark()
    } else {
        CanvasTheme::light()
    };
    let mut surface = Canvas2dSurface::new(
        ctx,
        config.thumbnail_size.width,
        config.thumbnail_size.height,
    );
    paint_thumbnail(&mut surface, &snapshot, &config, &theme);
    true
}

/// Thumbnail as an SVG document, or an empty string on a parse error.
#[wasm_bindgen]
pub fn thumbnail_svg(snapshot_json: &str) -> String {
    let Ok(snapshot) = Snapshot::from_json(snapshot_json) else {
        return String::new();
    };
    let config = CanvasConfig::default();
    let mut surface = SvgSurface::new(config.thumbnail_size);
    paint_thumbnail(&mut surface, &snapshot, &config, &CanvasTheme::light());
    surface.finish()
}
