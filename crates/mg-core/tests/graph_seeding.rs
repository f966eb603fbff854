//! Integration tests: entity lists → seeded scene with similarity edges.

use mg_core::*;

fn load(json: &str) -> Vec<Entity> {
    let _ = env_logger::builder().is_test(true).try_init();
    serde_json::from_str(json).expect("entity fixture should parse")
}

#[test]
fn identical_tags_link_exactly_one_pair() {
    let entities = load(
        r#"[
            {"id": "1", "content": "first", "tags": ["a", "b"]},
            {"id": "2", "content": "second", "tags": ["b", "a"]},
            {"id": "3", "content": "third", "tags": ["c"]}
        ]"#,
    );
    let (scene, ids) = build_scene(&entities, &GraphConfig::default());

    assert_eq!(scene.edge_count(), 1);
    let edge = scene.edges().next().unwrap();
    assert!(edge.connects(ids[0], ids[1]));
    assert_eq!(edge.strength, 1.0);
    assert_eq!(edge.tier, ColorTier::Strong);
}

#[test]
fn malformed_tags_still_produce_a_connected_scene() {
    let entities = load(
        r#"[
            {"id": "1", "title": "A", "tags": "not-a-list"},
            {"id": "2", "title": "B", "tags": null},
            {"id": "3", "title": "C"}
        ]"#,
    );
    let (scene, ids) = build_scene(&entities, &GraphConfig::default());
    assert_eq!(scene.node_count(), 3);
    assert_eq!(scene.edge_count(), 2);
    assert!(scene.edge_between(ids[0], ids[1]).is_some());
    assert!(scene.edge_between(ids[1], ids[2]).is_some());
}

#[test]
fn mixed_sources_map_to_node_kinds() {
    let entities = load(
        r#"[
            {"id": "m", "content": "note", "tags": ["x"], "source": "memory"},
            {"id": "k", "title": "Doc", "tags": ["x"], "source": "knowledge"}
        ]"#,
    );
    let (scene, ids) = build_scene(&entities, &GraphConfig::default());
    assert_eq!(scene.node(ids[0]).unwrap().kind, NodeKind::Memory);
    assert_eq!(scene.node(ids[1]).unwrap().kind, NodeKind::Knowledge);
    assert_eq!(scene.edge_between(ids[0], ids[1]).unwrap().label, "x");
}

#[test]
fn titled_entities_without_source_seed_knowledge_nodes() {
    let entities = load(
        r#"[
            {"id": "k1", "title": "Deploy checklist", "tags": ["ops"]},
            {"id": "m1", "content": "rotate keys", "tags": ["ops"]}
        ]"#,
    );
    let (scene, ids) = build_scene(&entities, &GraphConfig::default());
    let knowledge = scene.node(ids[0]).unwrap();
    assert_eq!(knowledge.kind, NodeKind::Knowledge);
    match &knowledge.payload {
        Payload::Knowledge(item) => assert_eq!(item.title, "Deploy checklist"),
        other => panic!("expected knowledge payload, got {other:?}"),
    }
    assert_eq!(scene.node(ids[1]).unwrap().kind, NodeKind::Memory);
}

#[test]
fn case_distinct_tags_fall_back_to_related_chain() {
    let entities = load(
        r#"[
            {"id": "1", "content": "a", "tags": ["Rust"]},
            {"id": "2", "content": "b", "tags": ["rust"]}
        ]"#,
    );
    let (scene, ids) = build_scene(&entities, &GraphConfig::default());
    let edge = scene.edge_between(ids[0], ids[1]).unwrap();
    assert_eq!(edge.kind, "related");
    assert_eq!(edge.tier, ColorTier::Weak);
}

#[test]
fn empty_input_builds_empty_scene() {
    let (scene, ids) = build_scene(&[], &GraphConfig::default());
    assert!(scene.is_empty());
    assert!(ids.is_empty());
}
