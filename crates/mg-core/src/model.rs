//! Core data model for the graph canvas.
//!
//! A scene is a set of positioned `Node`s (rectangles in world space) joined
//! by `Edge`s. Nodes optionally carry a `Payload` pointing back at the
//! dashboard entity they were built from. All coordinates are world-space
//! `f64`; the `Viewport` maps them to the screen.

use crate::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Add, Sub};

/// Default node footprint used when a `NodeSpec` leaves the size unset.
pub const DEFAULT_NODE_SIZE: Size = Size {
    width: 160.0,
    height: 80.0,
};

// ─── Geometry ────────────────────────────────────────────────────────────

/// A 2D point (world or screen space, depending on context).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width/height pair. Node sizes are always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace non-positive or non-finite dimensions with the default size.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };
        Self {
            width: fix(self.width, DEFAULT_NODE_SIZE.width),
            height: fix(self.height, DEFAULT_NODE_SIZE.height),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        DEFAULT_NODE_SIZE
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: `[x, x+w) × [y, y+h)`.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rectangle overlaps another (AABB overlap).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect::new(x, y, right - x, bottom - y)
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// What a node represents on the dashboard canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Memory,
    Knowledge,
    Prompt,
    Variable,
    Logic,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Memory,
        NodeKind::Knowledge,
        NodeKind::Prompt,
        NodeKind::Variable,
        NodeKind::Logic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Memory => "memory",
            NodeKind::Knowledge => "knowledge",
            NodeKind::Prompt => "prompt",
            NodeKind::Variable => "variable",
            NodeKind::Logic => "logic",
        }
    }

    /// Parse a kind name; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

/// A memory record the node was created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPayload {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub tags: SmallVec<[String; 4]>,
}

/// A knowledge-base item the node was created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItemPayload {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: SmallVec<[String; 4]>,
}

/// Reference back to the source entity of a node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Memory(MemoryPayload),
    Knowledge(KnowledgeItemPayload),
    #[default]
    None,
}

impl Payload {
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }
}

/// A positioned node in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub content: String,
    pub position: Point,
    #[serde(default)]
    pub size: Size,
    #[serde(default, skip_serializing_if = "Payload::is_none")]
    pub payload: Payload,
}

impl Node {
    /// World-space bounding rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.size.width,
            self.size.height,
        )
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// Partial node description for `SceneModel::add_node`.
/// Unset fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub label: String,
    pub content: String,
    pub position: Point,
    pub size: Option<Size>,
    pub payload: Payload,
}

impl NodeSpec {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Materialize the node under the given id.
    pub fn into_node(self, id: NodeId) -> Node {
        Node {
            id,
            kind: self.kind,
            label: self.label,
            content: self.content,
            position: self.position,
            size: self.size.unwrap_or_default().sanitized(),
            payload: self.payload,
        }
    }
}

/// Field-wise update for `SceneModel::update_node`. `None` leaves a field as is.
/// The id cannot be patched; a kind change is a pure relabel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub kind: Option<NodeKind>,
    pub label: Option<String>,
    pub content: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub payload: Option<Payload>,
}

impl NodePatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub(crate) fn apply_to(self, node: &mut Node) {
        if let Some(kind) = self.kind {
            node.kind = kind;
        }
        if let Some(label) = self.label {
            node.label = label;
        }
        if let Some(content) = self.content {
            node.content = content;
        }
        if let Some(position) = self.position {
            node.position = position;
        }
        if let Some(size) = self.size {
            node.size = size.sanitized();
        }
        if let Some(payload) = self.payload {
            node.payload = payload;
        }
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// Visual weight bucket of an edge, derived from its strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    #[default]
    Weak,
    Medium,
    Strong,
}

impl ColorTier {
    /// `Strong` above 0.7, `Medium` above 0.5, otherwise `Weak`.
    pub fn from_strength(strength: f64) -> Self {
        if strength > 0.7 {
            ColorTier::Strong
        } else if strength > 0.5 {
            ColorTier::Medium
        } else {
            ColorTier::Weak
        }
    }
}

/// A connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    #[serde(rename = "sourceId")]
    pub source: NodeId,
    #[serde(rename = "targetId")]
    pub target: NodeId,
    #[serde(default = "default_edge_kind")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_strength")]
    pub strength: f64,
    #[serde(default, rename = "colorTier")]
    pub tier: ColorTier,
}

fn default_edge_kind() -> String {
    "default".to_string()
}

fn default_strength() -> f64 {
    1.0
}

impl Edge {
    /// Build an edge with a fresh id; strength is clamped into `[0, 1]`
    /// and the tier derived from it.
    pub fn new(source: NodeId, target: NodeId, kind: impl Into<String>, strength: f64) -> Self {
        let strength = clamp_strength(strength);
        Self {
            id: EdgeId::generate(),
            source,
            target,
            kind: kind.into(),
            label: String::new(),
            strength,
            tier: ColorTier::from_strength(strength),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_tier(mut self, tier: ColorTier) -> Self {
        self.tier = tier;
        self
    }

    /// True if the edge joins `a` and `b` in either direction.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}

pub(crate) fn clamp_strength(strength: f64) -> f64 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}
