//! Scene initialization from dashboard entities.
//!
//! One node per entity, packed into a grid in input order, then connected
//! by the similarity builder.

use crate::config::GraphConfig;
use crate::entity::Entity;
use crate::id::NodeId;
use crate::model::{Edge, NodeSpec, Point};
use crate::scene::SceneModel;
use crate::similarity::{TaggedEntity, build_similarity_edges};

/// Maximum label length for seeded nodes.
const LABEL_CHARS: usize = 40;

/// Top-left corner of grid cell `index`.
pub fn grid_position(index: usize, columns: usize, config: &GraphConfig) -> Point {
    let columns = columns.max(1);
    let (row, col) = (index / columns, index % columns);
    Point::new(
        config.grid_margin + col as f64 * (config.node_size.width + config.grid_gap),
        config.grid_margin + row as f64 * (config.node_size.height + config.grid_gap),
    )
}

/// Columns used for `n` entities: configured, else `ceil(sqrt(n))`.
pub fn grid_columns(n: usize, config: &GraphConfig) -> usize {
    config
        .grid_columns
        .unwrap_or_else(|| (n as f64).sqrt().ceil() as usize)
        .max(1)
}

/// Build a scene from `entities`. Returns the scene and the node id created
/// for each entity, index-aligned with the input.
pub fn build_scene(entities: &[Entity], config: &GraphConfig) -> (SceneModel, Vec<NodeId>) {
    let mut scene = SceneModel::new();
    let columns = grid_columns(entities.len(), config);

    let ids: Vec<NodeId> = entities
        .iter()
        .enumerate()
        .map(|(i, entity)| {
            let pos = grid_position(i, columns, config);
            let spec = NodeSpec::new(entity.node_kind())
                .label(entity.label(LABEL_CHARS))
                .content(entity.content.clone().unwrap_or_default())
                .at(pos.x, pos.y)
                .size(config.node_size.width, config.node_size.height)
                .payload(entity.payload());
            scene.add_node(spec).id
        })
        .collect();

    let tagged: Vec<TaggedEntity> = entities
        .iter()
        .map(|e| TaggedEntity::new(e.id.as_str(), &e.tags))
        .collect();
    for spec in build_similarity_edges(&tagged, config) {
        let edge = Edge::new(ids[spec.source], ids[spec.target], spec.kind, spec.strength)
            .with_tier(spec.tier)
            .with_label(spec.label);
        scene.insert_edge(edge);
    }

    log::info!(
        "built scene: {} nodes, {} edges from {} entities",
        scene.node_count(),
        scene.edge_count(),
        entities.len()
    );
    (scene, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorTier, NodeKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn one_node_per_entity() {
        let entities = vec![
            Entity::memory("m1", "alpha", &["a"]),
            Entity::knowledge("k1", "Beta", &["b"]),
            Entity::memory("m2", "gamma", &["c"]),
        ];
        let (scene, ids) = build_scene(&entities, &GraphConfig::default());
        assert_eq!(scene.node_count(), 3);
        assert_eq!(ids.len(), 3);
        assert_eq!(scene.node(ids[1]).unwrap().kind, NodeKind::Knowledge);
        assert_eq!(scene.node(ids[1]).unwrap().label, "Beta");
    }

    #[test]
    fn similar_pair_gets_single_strong_edge() {
        let entities = vec![
            Entity::memory("m1", "one", &["a", "b"]),
            Entity::memory("m2", "two", &["b", "a"]),
            Entity::memory("m3", "three", &["c"]),
        ];
        let (scene, ids) = build_scene(&entities, &GraphConfig::default());
        assert_eq!(scene.edge_count(), 1);
        let edge = scene.edge_between(ids[0], ids[1]).unwrap();
        assert_eq!(edge.strength, 1.0);
        assert_eq!(edge.tier, ColorTier::Strong);
    }

    #[test]
    fn grid_cells_do_not_overlap() {
        let entities: Vec<Entity> = (0..10)
            .map(|i| Entity::memory(format!("m{i}"), "x", &[]))
            .collect();
        let (scene, _) = build_scene(&entities, &GraphConfig::default());
        let rects: Vec<_> = scene.nodes_in_z_order().map(|n| n.bounds()).collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn grid_wraps_at_column_count() {
        let cfg = GraphConfig::default();
        assert_eq!(grid_columns(10, &cfg), 4);
        assert_eq!(grid_columns(0, &cfg), 1);
        let p = grid_position(4, 4, &cfg);
        assert_eq!(p, Point::new(40.0, 40.0 + 80.0 + 40.0));
    }
}
