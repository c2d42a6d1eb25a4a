pub mod corpus;
pub mod ranker;
pub mod store;

mod error;

pub use corpus::{Corpus, CorpusHandle};
pub use error::{Error, Result};
pub use ranker::rank;
pub use store::FileVectorStore;

use serde::{Deserialize, Serialize};

/// Identifies the embedding space an artifact was produced in. Vectors from
/// different spaces are not comparable, so the store refuses to load an
/// artifact whose space does not match the configured provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingSpace {
	pub model: String,
	pub dimensions: u32,
}

impl EmbeddingSpace {
	pub fn new(model: impl Into<String>, dimensions: u32) -> Self {
		Self { model: model.into(), dimensions }
	}
}

impl std::fmt::Display for EmbeddingSpace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.model, self.dimensions)
	}
}

/// One retrieval unit: a span of source text paired with its embedding.
/// Entries are append-only within one ingestion and only ever replaced
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreEntry {
	pub chunk: String,
	pub embedding: Vec<f32>,
}
