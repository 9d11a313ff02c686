use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    content_chunk_id: String,
    model_name: String,
    generated_at: DateTime<Utc>,
    vector: Vec<f32>,
}

impl Embedding {
    pub fn new(content_chunk_id: String, model_name: String, vector: Vec<f32>) -> Self {
        Self {
            content_chunk_id,
            model_name,
            generated_at: Utc::now(),
            vector,
        }
    }

    pub fn content_chunk_id(&self) -> &str {
        &self.content_chunk_id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    pub fn cosine_similarity(&self, other: &[f32]) -> f32 {
        cosine_similarity(&self.vector, other)
    }

    /// `1 - cosine_similarity`, the distance reported to clients.
    pub fn cosine_distance(&self, other: &[f32]) -> f32 {
        1.0 - self.cosine_similarity(other)
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let embedding = Embedding::new("c".to_string(), "m".to_string(), vec![1.0, 2.0, 3.0]);
        assert!((embedding.cosine_similarity(&[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-6);
        assert!(embedding.cosine_distance(&[2.0, 4.0, 6.0]).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        let embedding = Embedding::new("c".to_string(), "m".to_string(), vec![1.0, 0.0]);
        assert!((embedding.cosine_distance(&[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((embedding.cosine_distance(&[-1.0, 0.0]) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
