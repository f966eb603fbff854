//! Persistable scene snapshots.
//!
//! A `Snapshot` is the value handed to the dashboard's save callback and to
//! thumbnail previews: every node and edge, the viewport, and the time it
//! was taken. JSON is the dashboard wire shape; MessagePack is offered for
//! compact local storage.

use crate::error::SnapshotError;
use crate::model::{Edge, Node, Point};
use crate::scene::SceneModel;
use crate::viewport::{Viewport, clamp_zoom};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub pan: Option<Point>,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as MessagePack with field names (stable across field reordering).
    pub fn to_msgpack(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Capture the scene and viewport, stamped with the current time.
pub fn serialize(scene: &SceneModel, viewport: &Viewport) -> Snapshot {
    Snapshot {
        nodes: scene.nodes_in_z_order().cloned().collect(),
        edges: scene.edges().cloned().collect(),
        zoom: Some(viewport.zoom()),
        pan: Some(viewport.pan),
        timestamp: Utc::now(),
    }
}

/// Rebuild a scene and viewport from a snapshot.
///
/// Node order is kept as z-order. Missing `zoom`/`pan` default to `1.0` and
/// the origin; zoom is clamped. Nodes with duplicate ids and edges breaking
/// scene invariants are dropped with a warning instead of failing the load.
pub fn deserialize(snapshot: &Snapshot) -> (SceneModel, Viewport) {
    let mut scene = SceneModel::new();
    for node in &snapshot.nodes {
        if !scene.insert_node(node.clone()) {
            log::warn!("snapshot: duplicate node {} dropped", node.id);
        }
    }
    for edge in &snapshot.edges {
        if scene.insert_edge(edge.clone()).is_none() {
            log::warn!(
                "snapshot: edge {} ({} -> {}) dropped",
                edge.id,
                edge.source,
                edge.target
            );
        }
    }

    let viewport = Viewport::new(
        clamp_zoom(snapshot.zoom.unwrap_or(1.0)),
        snapshot.pan.unwrap_or(Point::ZERO),
    );
    (scene, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, NodeSpec};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_viewport_fields_default() {
        let json = r#"{"nodes": [], "edges": [], "timestamp": "2026-01-01T00:00:00Z"}"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        let (scene, viewport) = deserialize(&snapshot);
        assert!(scene.is_empty());
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn out_of_range_zoom_is_clamped_on_load() {
        let json = r#"{"zoom": 9.5, "pan": {"x": 3, "y": 4}, "timestamp": "2026-01-01T00:00:00Z"}"#;
        let (_, viewport) = deserialize(&Snapshot::from_json(json).unwrap());
        assert_eq!(viewport.zoom(), 2.0);
        assert_eq!(viewport.pan, Point::new(3.0, 4.0));
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let json = r#"{
            "nodes": [{"id": "n1", "kind": "memory", "position": {"x": 0, "y": 0}}],
            "edges": [{"id": "e1", "sourceId": "n1", "targetId": "n404"}],
            "timestamp": "2026-01-01T00:00:00Z"
        }"#;
        let (scene, _) = deserialize(&Snapshot::from_json(json).unwrap());
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.edge_count(), 0);
    }

    #[test]
    fn json_shape_uses_dashboard_names() {
        let mut scene = SceneModel::new();
        let a = scene.add_node(NodeSpec::new(NodeKind::Prompt)).id;
        let b = scene.add_node(NodeSpec::new(NodeKind::Variable)).id;
        scene.add_edge(a, b, "default");
        let value = serde_json::to_value(serialize(&scene, &Viewport::default())).unwrap();
        let edge = &value["edges"][0];
        assert_eq!(edge["sourceId"], a.as_str());
        assert_eq!(edge["targetId"], b.as_str());
        assert_eq!(edge["colorTier"], "strong");
        assert_eq!(value["nodes"][0]["kind"], "prompt");
        assert_eq!(value["zoom"], 1.0);
    }
}
