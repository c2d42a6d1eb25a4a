use serde::{Deserialize, Serialize};

use dcq_retrieval::VectorStoreEntry;

use crate::{Error, QueryService, Result};

/// Extracted document text. PDF extraction happens upstream; by the time a
/// request lands here it is plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
	pub text: String,
	#[serde(default)]
	pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
	pub chunks: usize,
	pub generation: u64,
}

impl QueryService {
	/// Rebuilds the corpus wholesale: chunk, embed, persist, then publish.
	/// The artifact is written before the in-memory swap, so a crash between
	/// the two leaves the durable copy ahead of readers, never behind.
	pub async fn ingest(&self, req: IngestRequest) -> Result<IngestResponse> {
		let text = req.text.trim();

		if text.is_empty() {
			return Err(Error::InvalidRequest { message: "text is required.".to_string() });
		}

		let chunks =
			dcq_chunking::split_text(text, self.cfg.retrieval.max_chunk_chars as usize);

		if chunks.is_empty() {
			return Err(Error::InvalidRequest {
				message: "text produced no chunks.".to_string(),
			});
		}

		let embeddings =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &chunks).await?;

		if embeddings.len() != chunks.len() {
			return Err(Error::ProviderRejected {
				message: format!(
					"Embedding count mismatch: sent {} chunks, got {} embeddings.",
					chunks.len(),
					embeddings.len()
				),
			});
		}

		let expected = self.cfg.providers.embedding.dimensions as usize;

		for embedding in &embeddings {
			if embedding.len() != expected {
				return Err(Error::DimensionMismatch { expected, actual: embedding.len() });
			}
		}

		let entries: Vec<VectorStoreEntry> = chunks
			.into_iter()
			.zip(embeddings)
			.map(|(chunk, embedding)| VectorStoreEntry { chunk, embedding })
			.collect();

		let chunk_count = entries.len();
		// The lock spans the write and the swap; nothing awaits inside it.
		let generation = {
			let _guard = self.ingest_lock.lock().unwrap_or_else(|err| err.into_inner());

			self.store.save(&entries)?;
			self.corpus.replace(entries)
		};

		tracing::info!(
			chunks = chunk_count,
			generation,
			source = req.source.as_deref().unwrap_or("unspecified"),
			"Corpus replaced."
		);

		Ok(IngestResponse { chunks: chunk_count, generation })
	}
}
