//! The scene model: the single owner of nodes and edges.
//!
//! Nodes and edges live in a `StableDiGraph` so that removing a node drops
//! its incident edges in the same operation. Two side indices map the
//! public string ids to graph indices, and `z_order` records paint order
//! (later = drawn on top = wins hit tests).
//!
//! Mutations never panic. Apart from `update_node`, which reports
//! `SceneError::NodeNotFound`, every invalid request is a logged no-op.

use crate::error::SceneError;
use crate::id::{EdgeId, NodeId};
use crate::model::*;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SceneModel {
    graph: StableDiGraph<Node, Edge>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
    z_order: Vec<NodeId>,
}

impl SceneModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Create a node from a partial `NodeSpec` under a freshly generated id.
    pub fn add_node(&mut self, spec: NodeSpec) -> &Node {
        let mut id = NodeId::generate();
        while self.node_index.contains_key(&id) {
            id = NodeId::generate();
        }
        let idx = self.push_node(spec.into_node(id));
        &self.graph[idx]
    }

    /// Insert a fully-formed node whose id was chosen by the caller.
    /// Returns `false` (no-op) if the id is already taken.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.node_index.contains_key(&node.id) {
            log::debug!("insert_node: id {} already present, ignored", node.id);
            return false;
        }
        let mut node = node;
        node.size = node.size.sanitized();
        self.push_node(node);
        true
    }

    fn push_node(&mut self, node: Node) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.z_order.push(id);
        log::debug!("added node {id}");
        idx
    }

    /// Merge `patch` into the node. Fails only if the node does not exist.
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> Result<&Node, SceneError> {
        let idx = *self
            .node_index
            .get(&id)
            .ok_or(SceneError::NodeNotFound(id))?;
        let node = &mut self.graph[idx];
        patch.apply_to(node);
        log::trace!("updated node {id}");
        Ok(&self.graph[idx])
    }

    /// Remove a node together with every edge touching it.
    /// Returns the removed node, or `None` if it was absent.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.node_index.remove(&id)?;

        let incident: Vec<EdgeId> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        for edge_id in &incident {
            self.edge_index.remove(edge_id);
        }

        self.z_order.retain(|z| *z != id);
        let node = self.graph.remove_node(idx);
        log::debug!("removed node {id} and {} incident edge(s)", incident.len());
        node
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Nodes in paint order (first = bottom, last = top).
    pub fn nodes_in_z_order(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.z_order
            .iter()
            .filter_map(|id| self.node_index.get(id).map(|idx| &self.graph[*idx]))
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    /// Move a node to the top of the paint order. Returns `true` if the
    /// order changed; absent or already-topmost nodes leave it untouched.
    pub fn bring_to_front(&mut self, id: NodeId) -> bool {
        let Some(pos) = self.z_order.iter().position(|z| *z == id) else {
            return false;
        };
        if pos + 1 == self.z_order.len() {
            return false;
        }
        let id = self.z_order.remove(pos);
        self.z_order.push(id);
        log::trace!("raised node {id}");
        true
    }

    // ─── Edges ───────────────────────────────────────────────────────────

    /// Connect two nodes with full-strength, unlabeled edge of `kind`.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, kind: &str) -> Option<&Edge> {
        self.add_weighted_edge(source, target, kind, 1.0, "")
    }

    /// Connect two nodes. No-op (`None`) on a self-loop, a missing endpoint,
    /// or when the unordered pair is already connected.
    pub fn add_weighted_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: &str,
        strength: f64,
        label: &str,
    ) -> Option<&Edge> {
        self.insert_edge(Edge::new(source, target, kind, strength).with_label(label))
    }

    /// Insert a fully-formed edge under the same rules as `add_weighted_edge`.
    /// Also rejects an edge whose id is already in use.
    pub fn insert_edge(&mut self, edge: Edge) -> Option<&Edge> {
        if edge.source == edge.target {
            log::debug!("add_edge: self-loop on {} ignored", edge.source);
            return None;
        }
        let (Some(&a), Some(&b)) = (
            self.node_index.get(&edge.source),
            self.node_index.get(&edge.target),
        ) else {
            log::debug!(
                "add_edge: missing endpoint {} -> {}, ignored",
                edge.source,
                edge.target
            );
            return None;
        };
        if self.graph.find_edge_undirected(a, b).is_some() {
            log::debug!(
                "add_edge: {} <-> {} already connected, ignored",
                edge.source,
                edge.target
            );
            return None;
        }
        if self.edge_index.contains_key(&edge.id) {
            log::debug!("add_edge: edge id {} already present, ignored", edge.id);
            return None;
        }

        let mut edge = edge;
        edge.strength = clamp_strength(edge.strength);
        let id = edge.id;
        let eidx = self.graph.add_edge(a, b, edge);
        self.edge_index.insert(id, eidx);
        log::debug!("added edge {id}");
        self.graph.edge_weight(eidx)
    }

    /// Remove an edge. No-op if absent.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let eidx = self.edge_index.remove(&id)?;
        self.graph.remove_edge(eidx)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index
            .get(&id)
            .and_then(|eidx| self.graph.edge_weight(*eidx))
    }

    /// The edge joining `a` and `b` in either direction, if any.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        let (ia, ib) = (*self.node_index.get(&a)?, *self.node_index.get(&b)?);
        let (eidx, _) = self.graph.find_edge_undirected(ia, ib)?;
        self.graph.edge_weight(eidx)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph
            .edge_indices()
            .filter_map(|eidx| self.graph.edge_weight(eidx))
    }

    /// Edges touching `id`, in either direction.
    pub fn edges_of(&self, id: NodeId) -> Vec<&Edge> {
        let Some(&idx) = self.node_index.get(&id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight())
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    // ─── Whole-scene ─────────────────────────────────────────────────────

    /// Union of all node rectangles, or `None` for an empty scene.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.nodes_in_z_order()
            .map(Node::bounds)
            .reduce(|acc, r| acc.union(&r))
    }

    pub fn is_empty(&self) -> bool {
        self.node_index.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
