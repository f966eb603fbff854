//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the wasm bridge and native hosts resolve keys identically.

use crate::input::Modifiers;
use crate::tools::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    Tool(ToolKind),

    // ── Edit ──
    /// Remove the selected node and its edges.
    Delete,
    /// Abort the current gesture, close the edit surface, or deselect.
    Cancel,
    /// Hand a snapshot to the save callback.
    Save,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ZoomToFit,
}

/// Resolves key events into shortcut actions.
///
/// ⌘ (macOS) and Ctrl are interchangeable.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"s"`, `"Delete"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() {
            return match key {
                "s" | "S" => Some(ShortcutAction::Save),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomReset),
                "1" => Some(ShortcutAction::ZoomToFit),
                _ => None,
            };
        }

        if modifiers.shift {
            return match key {
                // Shift+= arrives as "+" on most layouts.
                "+" => Some(ShortcutAction::ZoomIn),
                "!" | "1" => Some(ShortcutAction::ZoomToFit),
                _ => None,
            };
        }

        match key {
            "v" | "V" => Some(ShortcutAction::Tool(ToolKind::Select)),
            "n" | "N" => Some(ShortcutAction::Tool(ToolKind::Add)),
            "c" | "C" => Some(ShortcutAction::Tool(ToolKind::Connect)),
            "h" | "H" => Some(ShortcutAction::Tool(ToolKind::Pan)),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Cancel),
            "=" => Some(ShortcutAction::ZoomIn),
            "-" => Some(ShortcutAction::ZoomOut),
            _ => None,
        }
    }
}
