//! Visual styles for node kinds and edge tiers.
//!
//! Every `NodeKind` and `ColorTier` maps to its style through an exhaustive
//! `match`, so adding a kind without a style is a compile error.

use mg_core::model::{ColorTier, NodeKind};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string: `#RRGGBB` when opaque, `rgba(...)` otherwise.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }
}

/// How a node of a given kind is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub fill: Color,
    pub stroke: Color,
    pub text: Color,
    /// Short badge drawn in the node's corner.
    pub badge: &'static str,
    pub corner_radius: f64,
}

pub fn node_style(kind: NodeKind) -> NodeStyle {
    match kind {
        NodeKind::Memory => NodeStyle {
            fill: Color::rgb(0xE8, 0xF1, 0xFF),
            stroke: Color::rgb(0x3B, 0x82, 0xF6),
            text: Color::rgb(0x1E, 0x3A, 0x8A),
            badge: "MEM",
            corner_radius: 8.0,
        },
        NodeKind::Knowledge => NodeStyle {
            fill: Color::rgb(0xEC, 0xFD, 0xF5),
            stroke: Color::rgb(0x10, 0xB9, 0x81),
            text: Color::rgb(0x06, 0x4E, 0x3B),
            badge: "KB",
            corner_radius: 8.0,
        },
        NodeKind::Prompt => NodeStyle {
            fill: Color::rgb(0xF5, 0xF3, 0xFF),
            stroke: Color::rgb(0x8B, 0x5C, 0xF6),
            text: Color::rgb(0x4C, 0x1D, 0x95),
            badge: "PROMPT",
            corner_radius: 12.0,
        },
        NodeKind::Variable => NodeStyle {
            fill: Color::rgb(0xFF, 0xFB, 0xEB),
            stroke: Color::rgb(0xF5, 0x9E, 0x0B),
            text: Color::rgb(0x78, 0x35, 0x0F),
            badge: "VAR",
            corner_radius: 4.0,
        },
        NodeKind::Logic => NodeStyle {
            fill: Color::rgb(0xFE, 0xF2, 0xF2),
            stroke: Color::rgb(0xEF, 0x44, 0x44),
            text: Color::rgb(0x7F, 0x1D, 0x1D),
            badge: "LOGIC",
            corner_radius: 0.0,
        },
    }
}

/// How an edge of a given strength tier is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub color: Color,
    pub width: f64,
}

pub fn edge_style(tier: ColorTier) -> EdgeStyle {
    match tier {
        ColorTier::Weak => EdgeStyle {
            color: Color::rgb(0x9C, 0xA3, 0xAF),
            width: 1.0,
        },
        ColorTier::Medium => EdgeStyle {
            color: Color::rgb(0xF5, 0x9E, 0x0B),
            width: 1.75,
        },
        ColorTier::Strong => EdgeStyle {
            color: Color::rgb(0x10, 0xB9, 0x81),
            width: 2.5,
        },
    }
}

/// Theme-dependent colors for the canvas background and overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTheme {
    pub bg: Color,
    pub selection: Color,
    pub preview: Color,
    pub overlay_text: Color,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: Color::rgb(0xF5, 0xF5, 0xF7),
            selection: Color::rgb(0x4F, 0xC3, 0xF7),
            preview: Color::rgb(0x63, 0x66, 0xF1),
            overlay_text: Color::rgb(0x6B, 0x70, 0x80),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::rgb(0x1C, 0x1C, 0x1E),
            selection: Color::rgb(0x4F, 0xC3, 0xF7),
            preview: Color::rgb(0xA5, 0xB4, 0xFC),
            overlay_text: Color::rgb(0x98, 0x98, 0x9D),
        }
    }
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_strings() {
        assert_eq!(Color::rgb(0x6C, 0x5C, 0xE7).to_css(), "#6C5CE7");
        assert_eq!(Color::rgba(255, 0, 0, 0).to_css(), "rgba(255, 0, 0, 0.000)");
    }

    #[test]
    fn every_kind_has_a_distinct_badge() {
        let badges: std::collections::HashSet<_> =
            NodeKind::ALL.iter().map(|k| node_style(*k).badge).collect();
        assert_eq!(badges.len(), NodeKind::ALL.len());
    }

    #[test]
    fn stronger_tiers_draw_thicker() {
        assert!(edge_style(ColorTier::Strong).width > edge_style(ColorTier::Medium).width);
        assert!(edge_style(ColorTier::Medium).width > edge_style(ColorTier::Weak).width);
    }
}
