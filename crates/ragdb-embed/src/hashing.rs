use std::hash::{Hash, Hasher};

use ragdb_core::traits::Embedder;
use twox_hash::XxHash64;

use crate::norm::{dot, l2_normalize};
use crate::tokenize::terms;

/// Feature-hashing embedder: every term lands in one of `dim` buckets and
/// the result is L2-normalized, so scores are cosine similarities in
/// `[0, 1]`. Deterministic and model-free.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
    id: String,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self { dim, id: format!("hashing:d{dim}") }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Embedder for HashingEmbedder {
    type Vector = Vec<f32>;

    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in terms(text).iter().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += val + (i % 3) as f32 * 0.01;
        }
        l2_normalize(&mut v);
        v
    }

    fn similarity(&self, query: &Vec<f32>, document: &Vec<f32>) -> f32 {
        dot(query, document).max(0.0)
    }
}
