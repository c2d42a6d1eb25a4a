use std::sync::Arc;

use dcq_retrieval::{CorpusHandle, EmbeddingSpace, FileVectorStore};
use dcq_service::{Providers, QueryService};
use dcq_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<QueryService>,
}

impl AppState {
	pub async fn new(config: dcq_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;
		let space = EmbeddingSpace::new(
			config.providers.embedding.model.clone(),
			config.providers.embedding.dimensions,
		);
		let store = FileVectorStore::new(&config.storage.vector_store.path, space);
		let entries = store.load()?;

		if !entries.is_empty() {
			tracing::info!(entries = entries.len(), "Vector store loaded from disk.");
		}

		let corpus = CorpusHandle::new(entries);
		let service =
			QueryService::new(config, store, corpus, Providers::external(), Arc::new(db));

		Ok(Self { service: Arc::new(service) })
	}
}
