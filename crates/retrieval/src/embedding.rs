//! Embedding Service (spec C8): turns template content into vectors, answers
//! semantic-path queries with a flat inner-product index, and persists the
//! index to disk so it need not be rebuilt on every boot.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;
use crate::reputation::ReputationTier;
use crate::template::Template;

/// Turns text into a fixed-dimension embedding. A real deployment wires in a
/// local or hosted model; tests substitute a deterministic mock.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait EncoderPort: Send + Sync {
    #[allow(async_fn_in_trait)]
    async fn encode(&self, text: &str) -> Vec<f32>;
    fn dimension(&self) -> usize;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    template_id: String,
    vector: Vec<f32>,
    allowed_tiers: Option<BTreeSet<ReputationTier>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

/// A scored template hit from `search()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub template_id: String,
    pub score: f32,
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Holds every embedded template's vector and enough metadata to apply
/// reputation gating at query time without consulting the pack loader.
pub struct EmbeddingService<E: EncoderPort> {
    encoder: E,
    dimension: usize,
    batch_size: usize,
    entries: Vec<IndexEntry>,
}

impl<E: EncoderPort> EmbeddingService<E> {
    pub fn new(encoder: E, batch_size: usize) -> Self {
        let dimension = encoder.dimension();
        Self {
            encoder,
            dimension,
            batch_size,
            entries: Vec::new(),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Embeds every template not already present (matched by `template_id`)
    /// and appends it to the index, chunked by `batch_size`.
    pub async fn add_templates(&mut self, templates: &[Template]) -> Result<usize, RetrievalError> {
        let mut added = 0;
        for chunk in templates.chunks(self.batch_size.max(1)) {
            for template in chunk {
                if self.entries.iter().any(|e| e.template_id == template.template_id) {
                    continue;
                }
                let vector = self.encoder.encode(&template.content).await;
                if vector.len() != self.dimension {
                    return Err(RetrievalError::IndexMismatch {
                        reason: format!(
                            "encoder produced {}-dim vector, expected {}",
                            vector.len(),
                            self.dimension
                        ),
                    });
                }
                self.entries.push(IndexEntry {
                    template_id: template.template_id.clone(),
                    vector,
                    allowed_tiers: template.reputation_tier.clone(),
                });
                added += 1;
            }
        }
        Ok(added)
    }

    /// Embeds `query`, scores every candidate by inner product, then takes a
    /// `top_k * 2` pool before applying the reputation filter and truncating
    /// to `top_k` (spec §4.8.1: filter narrows, never widens, the pool).
    pub async fn search(&self, query: &str, top_k: usize, tier: ReputationTier) -> Vec<SearchHit> {
        if top_k == 0 || self.entries.is_empty() {
            return Vec::new();
        }
        let query_vec = self.encoder.encode(query).await;

        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| (inner_product(&query_vec, &entry.vector), entry))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let pool_size = (top_k * 2).min(scored.len());
        scored
            .into_iter()
            .take(pool_size)
            .filter(|(_, entry)| {
                entry
                    .allowed_tiers
                    .as_ref()
                    .map(|whitelist| whitelist.contains(&tier))
                    .unwrap_or(true)
            })
            .take(top_k)
            .map(|(score, entry)| SearchHit {
                template_id: entry.template_id.clone(),
                score,
            })
            .collect()
    }

    pub fn save_index(&self, path: &Path) -> Result<(), RetrievalError> {
        let persisted = PersistedIndex {
            dimension: self.dimension,
            entries: self.entries.clone(),
        };
        let raw = serde_json::to_string(&persisted).map_err(|e| RetrievalError::Io(e.to_string()))?;
        fs::write(path, raw).map_err(|e| RetrievalError::Io(e.to_string()))
    }

    /// Loads a previously saved index, rejecting it if its dimension doesn't
    /// match this service's encoder (spec §4.8.1 edge case).
    pub fn load_index(&mut self, path: &Path) -> Result<(), RetrievalError> {
        let raw = fs::read_to_string(path).map_err(|e| RetrievalError::Io(e.to_string()))?;
        let persisted: PersistedIndex =
            serde_json::from_str(&raw).map_err(|e| RetrievalError::Io(e.to_string()))?;
        if persisted.dimension != self.dimension {
            return Err(RetrievalError::IndexMismatch {
                reason: format!(
                    "saved index has dimension {}, encoder expects {}",
                    persisted.dimension, self.dimension
                ),
            });
        }
        self.entries = persisted.entries;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_encoder(dim: usize) -> MockEncoderPort {
        let mut mock = MockEncoderPort::new();
        mock.expect_dimension().return_const(dim);
        mock
    }

    fn fixed_vector(v: Vec<f32>) -> Vec<f32> {
        v
    }

    #[tokio::test]
    async fn add_templates_is_idempotent_by_template_id() {
        let mut encoder = axis_encoder(2);
        encoder.expect_encode().returning(|_| fixed_vector(vec![1.0, 0.0]));
        let mut service = EmbeddingService::new(encoder, 8);

        let templates = vec![Template::new("t1", "hello")];
        service.add_templates(&templates).await.unwrap();
        let added_again = service.add_templates(&templates).await.unwrap();

        assert_eq!(added_again, 0);
        assert_eq!(service.len(), 1);
    }

    #[tokio::test]
    async fn search_ranks_by_inner_product_and_applies_reputation_filter() {
        let mut encoder = axis_encoder(2);
        encoder
            .expect_encode()
            .returning(|text| match text {
                "close" => fixed_vector(vec![1.0, 0.0]),
                "far" => fixed_vector(vec![0.0, 1.0]),
                _ => fixed_vector(vec![1.0, 0.0]),
            });
        let mut service = EmbeddingService::new(encoder, 8);

        let templates = vec![
            Template::new("close", "close").with_reputation_tiers([ReputationTier::Revered]),
            Template::new("far", "far"),
        ];
        service.add_templates(&templates).await.unwrap();

        let hits = service.search("close", 5, ReputationTier::Hostile).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].template_id, "far");

        let hits = service.search("close", 5, ReputationTier::Revered).await;
        assert_eq!(hits[0].template_id, "close");
    }

    #[tokio::test]
    async fn save_and_load_round_trips_the_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut encoder = axis_encoder(2);
        encoder.expect_encode().returning(|_| fixed_vector(vec![0.5, 0.5]));
        let mut service = EmbeddingService::new(encoder, 8);
        service.add_templates(&[Template::new("t1", "hi")]).await.unwrap();
        service.save_index(&path).unwrap();

        let mut encoder2 = axis_encoder(2);
        encoder2.expect_encode().returning(|_| fixed_vector(vec![0.5, 0.5]));
        let mut service2 = EmbeddingService::new(encoder2, 8);
        service2.load_index(&path).unwrap();
        assert_eq!(service2.len(), 1);
    }

    #[tokio::test]
    async fn load_index_rejects_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut encoder = axis_encoder(2);
        encoder.expect_encode().returning(|_| fixed_vector(vec![0.5, 0.5]));
        let mut service = EmbeddingService::new(encoder, 8);
        service.add_templates(&[Template::new("t1", "hi")]).await.unwrap();
        service.save_index(&path).unwrap();

        let encoder3 = axis_encoder(3);
        let mut service3 = EmbeddingService::new(encoder3, 8);
        assert!(service3.load_index(&path).is_err());
    }
}
