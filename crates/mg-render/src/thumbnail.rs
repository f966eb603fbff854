//! Read-only preview of a saved snapshot.
//!
//! Same node and edge geometry as the interactive canvas, drawn at
//! `CanvasConfig::thumbnail_scale` and centred on the surface, without
//! labels, selection or pointer handling. A caption in the bottom-left
//! corner reports the node and edge counts.

use crate::paint::{Detail, Projection, paint_edge, paint_node};
use crate::style::CanvasTheme;
use crate::surface::{Surface, TextAlign, TextStyle};
use mg_core::config::CanvasConfig;
use mg_core::id::NodeId;
use mg_core::model::{Node, Point, Rect};
use mg_core::snapshot::Snapshot;
use std::collections::HashMap;

const CAPTION_SIZE: f64 = 11.0;
const CAPTION_MARGIN: f64 = 8.0;

/// `"{n} nodes · {m} edges"`, singular for a count of one.
pub fn caption(snapshot: &Snapshot) -> String {
    format!(
        "{} · {}",
        count(snapshot.node_count(), "node"),
        count(snapshot.edge_count(), "edge")
    )
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// The projection that centres the snapshot's content on the surface at
/// the configured scale. Empty snapshots map the world origin to the
/// surface's top-left corner.
pub fn thumbnail_projection(
    snapshot: &Snapshot,
    config: &CanvasConfig,
    width: f64,
    height: f64,
) -> Projection {
    let scale = config.thumbnail_scale;
    let bounds = snapshot
        .nodes
        .iter()
        .map(Node::bounds)
        .reduce(|acc, r| acc.union(&r));
    let offset = match bounds {
        Some(b) => {
            let c = b.center();
            Point::new(width / 2.0 - c.x * scale, height / 2.0 - c.y * scale)
        }
        None => Point::ZERO,
    };
    Projection { scale, offset }
}

/// Paint `snapshot` as a thumbnail.
pub fn paint_thumbnail(
    surface: &mut dyn Surface,
    snapshot: &Snapshot,
    config: &CanvasConfig,
    theme: &CanvasTheme,
) {
    let size = surface.size();
    let projection = thumbnail_projection(snapshot, config, size.width, size.height);
    let detail = Detail {
        labels: false,
        edge_labels: false,
    };
    surface.clear(theme.bg);

    let by_id: HashMap<NodeId, &Node> = snapshot.nodes.iter().map(|n| (n.id, n)).collect();
    for edge in &snapshot.edges {
        match (by_id.get(&edge.source), by_id.get(&edge.target)) {
            (Some(a), Some(b)) => paint_edge(surface, &projection, edge, a, b, detail),
            _ => log::debug!("thumbnail: edge {} has a missing endpoint", edge.id),
        }
    }

    let visible = Rect::new(0.0, 0.0, size.width, size.height);
    for node in &snapshot.nodes {
        if projection.rect(node.bounds()).intersects(&visible) {
            paint_node(surface, &projection, node, false, theme, detail);
        }
    }

    surface.text(
        Point::new(CAPTION_MARGIN, size.height - CAPTION_MARGIN - CAPTION_SIZE),
        &caption(snapshot),
        &TextStyle {
            color: theme.overlay_text,
            size: CAPTION_SIZE,
            bold: false,
            align: TextAlign::Left,
        },
    );
}
