//! Hit testing: point → node lookup.
//!
//! Reverse-walks the z-order (front-to-back) to find which node is at a
//! given world position.

use mg_core::model::{Node, Point, Rect};

/// Find the topmost node containing `point` (world coordinates).
///
/// `nodes` must be in paint order; when several nodes overlap the point,
/// the one painted last wins. Containment is half-open:
/// `[x, x+w) × [y, y+h)`.
pub fn hit_test<'a, I>(point: Point, nodes: I) -> Option<&'a Node>
where
    I: IntoIterator<Item = &'a Node>,
    I::IntoIter: DoubleEndedIterator,
{
    nodes
        .into_iter()
        .rev()
        .find(|node| node.bounds().contains(point))
}

/// Find all nodes whose bounds intersect the given world rectangle, in
/// paint order.
pub fn hit_test_rect<'a, I>(rect: Rect, nodes: I) -> Vec<&'a Node>
where
    I: IntoIterator<Item = &'a Node>,
{
    nodes
        .into_iter()
        .filter(|node| node.bounds().intersects(&rect))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mg_core::id::NodeId;
    use mg_core::model::{NodeKind, NodeSpec};

    fn node(name: &str, x: f64, y: f64, w: f64, h: f64) -> Node {
        NodeSpec::new(NodeKind::Memory)
            .at(x, y)
            .size(w, h)
            .into_node(NodeId::intern(name))
    }

    #[test]
    fn hit_test_basic() {
        let nodes = [node("a", 10.0, 10.0, 100.0, 100.0), node("b", 200.0, 200.0, 50.0, 50.0)];

        assert_eq!(
            hit_test(Point::new(15.0, 15.0), &nodes).map(|n| n.id),
            Some(NodeId::intern("a"))
        );
        assert_eq!(
            hit_test(Point::new(249.0, 249.0), &nodes).map(|n| n.id),
            Some(NodeId::intern("b"))
        );
        assert!(hit_test(Point::new(150.0, 150.0), &nodes).is_none());
    }

    #[test]
    fn edges_are_half_open() {
        let n = node("edge_case", 100.0, 100.0, 50.0, 20.0);
        let hits = |x, y| hit_test(Point::new(x, y), [&n]).is_some();

        assert!(hits(100.0, 100.0));
        assert!(hits(149.999, 119.999));
        assert!(!hits(150.0, 110.0));
        assert!(!hits(120.0, 120.0));
        assert!(!hits(99.999, 110.0));
        assert!(!hits(120.0, 99.999));
    }

    #[test]
    fn topmost_node_wins() {
        let nodes = [
            node("bottom", 0.0, 0.0, 100.0, 100.0),
            node("top", 50.0, 50.0, 100.0, 100.0),
        ];
        let hit = hit_test(Point::new(75.0, 75.0), &nodes).unwrap();
        assert_eq!(hit.id, NodeId::intern("top"));

        let hit = hit_test(Point::new(25.0, 25.0), &nodes).unwrap();
        assert_eq!(hit.id, NodeId::intern("bottom"));
    }

    #[test]
    fn empty_list_misses() {
        assert!(hit_test(Point::ZERO, &[] as &[Node]).is_none());
    }

    #[test]
    fn rect_query_collects_intersecting() {
        let nodes = [
            node("r1", 0.0, 0.0, 10.0, 10.0),
            node("r2", 20.0, 0.0, 10.0, 10.0),
            node("r3", 100.0, 100.0, 10.0, 10.0),
        ];
        let hits: Vec<NodeId> = hit_test_rect(Rect::new(5.0, 5.0, 20.0, 20.0), &nodes)
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(hits, vec![NodeId::intern("r1"), NodeId::intern("r2")]);
    }
}
