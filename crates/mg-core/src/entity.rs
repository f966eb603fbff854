//! Dashboard entities fed into the canvas.
//!
//! Memories and knowledge-base items arrive as loosely-shaped JSON. Only
//! `id`, a title or content, and `tags` matter here. A malformed `tags`
//! field (missing, null, not an array) is read as "no tags" rather than
//! rejecting the whole entity.

use crate::model::{KnowledgeItemPayload, MemoryPayload, NodeKind, Payload};
use serde::{Deserialize, Deserializer};
use smallvec::SmallVec;

/// Where an entity came from; decides the node kind and payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitySource {
    Memory,
    Knowledge,
}

/// A seed entity for scene initialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    /// Explicit origin. When absent, see [`Entity::source`].
    #[serde(default)]
    pub source: Option<EntitySource>,
}

impl Entity {
    pub fn memory(id: impl Into<String>, content: impl Into<String>, tags: &[&str]) -> Self {
        Self {
            id: id.into(),
            title: None,
            content: Some(content.into()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source: Some(EntitySource::Memory),
        }
    }

    pub fn knowledge(id: impl Into<String>, title: impl Into<String>, tags: &[&str]) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            content: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source: Some(EntitySource::Knowledge),
        }
    }

    /// The declared source, else `Knowledge` for titled entities and
    /// `Memory` for everything else.
    pub fn source(&self) -> EntitySource {
        match (self.source, &self.title) {
            (Some(source), _) => source,
            (None, Some(title)) if !title.trim().is_empty() => EntitySource::Knowledge,
            (None, _) => EntitySource::Memory,
        }
    }

    pub fn node_kind(&self) -> NodeKind {
        match self.source() {
            EntitySource::Memory => NodeKind::Memory,
            EntitySource::Knowledge => NodeKind::Knowledge,
        }
    }

    /// Display label: the title, else the first content line, capped at
    /// `max_chars` characters with a trailing ellipsis.
    pub fn label(&self, max_chars: usize) -> String {
        let raw = self
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.content.as_deref().and_then(|c| c.lines().next()))
            .unwrap_or(self.id.as_str())
            .trim();
        if raw.chars().count() > max_chars {
            let mut s: String = raw.chars().take(max_chars).collect();
            s.push('…');
            s
        } else {
            raw.to_string()
        }
    }

    pub fn payload(&self) -> Payload {
        let tags: SmallVec<[String; 4]> = self.tags.iter().cloned().collect();
        match self.source() {
            EntitySource::Memory => Payload::Memory(MemoryPayload {
                id: self.id.clone(),
                content: self.content.clone().unwrap_or_default(),
                tags,
            }),
            EntitySource::Knowledge => Payload::Knowledge(KnowledgeItemPayload {
                id: self.id.clone(),
                title: self.title.clone().unwrap_or_default(),
                content: self.content.clone().unwrap_or_default(),
                tags,
            }),
        }
    }
}

/// Accept string or numeric ids.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Keep only the string members of an array; anything else is no tags.
fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_tags_become_empty() {
        let entities: Vec<Entity> = serde_json::from_str(
            r#"[
                {"id": "a", "content": "x", "tags": null},
                {"id": "b", "content": "y", "tags": "oops"},
                {"id": "c", "content": "z"},
                {"id": "d", "content": "w", "tags": ["ok", 3, null, "fine"]}
            ]"#,
        )
        .unwrap();
        assert!(entities[0].tags.is_empty());
        assert!(entities[1].tags.is_empty());
        assert!(entities[2].tags.is_empty());
        assert_eq!(entities[3].tags, vec!["ok", "fine"]);
    }

    #[test]
    fn numeric_id_is_accepted() {
        let e: Entity = serde_json::from_str(r#"{"id": 17, "title": "T"}"#).unwrap();
        assert_eq!(e.id, "17");
    }

    #[test]
    fn label_prefers_title_then_first_line() {
        let k = Entity::knowledge("k", "Rust notes", &[]);
        assert_eq!(k.label(40), "Rust notes");

        let m = Entity::memory("m", "first line\nsecond line", &[]);
        assert_eq!(m.label(40), "first line");

        let long = Entity::memory("l", "abcdefghij", &[]);
        assert_eq!(long.label(4), "abcd…");
    }

    #[test]
    fn payload_matches_source() {
        let k = Entity::knowledge("k1", "Title", &["t"]);
        match k.payload() {
            Payload::Knowledge(item) => {
                assert_eq!(item.id, "k1");
                assert_eq!(item.title, "Title");
                assert_eq!(item.tags.as_slice(), ["t".to_string()]);
            }
            other => panic!("expected knowledge payload, got {other:?}"),
        }
        assert_eq!(k.node_kind(), NodeKind::Knowledge);
    }

    #[test]
    fn missing_source_is_inferred_from_title() {
        let entities: Vec<Entity> = serde_json::from_str(
            r#"[
                {"id": "k1", "title": "Deploy checklist", "tags": ["ops"]},
                {"id": "m1", "content": "standup notes", "tags": ["ops"]},
                {"id": "m2", "title": "Pinned", "content": "x", "source": "memory"}
            ]"#,
        )
        .unwrap();

        assert_eq!(entities[0].node_kind(), NodeKind::Knowledge);
        match entities[0].payload() {
            Payload::Knowledge(item) => assert_eq!(item.title, "Deploy checklist"),
            other => panic!("expected knowledge payload, got {other:?}"),
        }
        assert_eq!(entities[1].source(), EntitySource::Memory);
        assert_eq!(entities[2].source(), EntitySource::Memory);
    }
}
