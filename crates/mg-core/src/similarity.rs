//! Relationship inference from tag overlap.
//!
//! Every unordered pair of entities is scored by Jaccard similarity over
//! their tag sets: `|A ∩ B| / |A ∪ B|`. Pairs scoring above the
//! threshold become edges whose strength is the score. A graph with two or
//! more entities must never come out edgeless, so when no pair qualifies a
//! short weak chain links the first few entities in input order.

use crate::config::GraphConfig;
use crate::model::ColorTier;
use std::collections::BTreeSet;

/// Edge kind given to similarity edges.
pub const SIMILAR_KIND: &str = "similar";
/// Edge kind given to fallback chain edges.
pub const RELATED_KIND: &str = "related";
/// Strength assigned to fallback chain edges.
pub const FALLBACK_STRENGTH: f64 = 0.1;

/// An entity reduced to what the builder needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEntity {
    pub id: String,
    pub tags: BTreeSet<String>,
}

impl TaggedEntity {
    /// Collect raw tags into a set. Empty strings are dropped and duplicates
    /// collapse; tags are otherwise compared exactly as given.
    pub fn new<I, S>(id: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = tags
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            id: id.into(),
            tags,
        }
    }
}

/// An edge proposed by the builder, by entity position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub source: usize,
    pub target: usize,
    pub kind: &'static str,
    pub strength: f64,
    pub tier: ColorTier,
    /// Shared tags, sorted and comma-joined. Empty for fallback edges.
    pub label: String,
}

/// Jaccard similarity of two tag sets. Zero if either set is empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Build the similarity edge set for `entities`.
pub fn build_similarity_edges(entities: &[TaggedEntity], config: &GraphConfig) -> Vec<EdgeSpec> {
    let mut edges = Vec::new();

    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            let (a, b) = (&entities[i].tags, &entities[j].tags);
            let score = jaccard(a, b);
            if score > config.similarity_threshold {
                let shared: Vec<&str> = a.intersection(b).map(String::as_str).collect();
                edges.push(EdgeSpec {
                    source: i,
                    target: j,
                    kind: SIMILAR_KIND,
                    strength: score,
                    tier: ColorTier::from_strength(score),
                    label: shared.join(", "),
                });
            }
        }
    }

    if edges.is_empty() && entities.len() > 1 {
        let chain = config.fallback_chain_len.max(1).min(entities.len() - 1);
        log::debug!(
            "no similar pairs among {} entities, linking a fallback chain of {chain}",
            entities.len()
        );
        edges.extend((0..chain).map(|k| EdgeSpec {
            source: k,
            target: k + 1,
            kind: RELATED_KIND,
            strength: FALLBACK_STRENGTH,
            tier: ColorTier::Weak,
            label: String::new(),
        }));
    }

    edges
}
