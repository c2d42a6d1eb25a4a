//! Shared in-memory view of the most recently ingested corpus. Readers take
//! a cheap snapshot; ingestion swaps the whole corpus under an exclusive
//! lock and bumps a monotonic generation, so a reader never observes a
//! half-replaced store and callers can detect staleness.

use std::sync::{Arc, RwLock};

use crate::VectorStoreEntry;

#[derive(Debug)]
pub struct Corpus {
	pub generation: u64,
	pub entries: Vec<VectorStoreEntry>,
}

pub struct CorpusHandle {
	inner: RwLock<Arc<Corpus>>,
}

impl CorpusHandle {
	pub fn new(entries: Vec<VectorStoreEntry>) -> Self {
		Self { inner: RwLock::new(Arc::new(Corpus { generation: 0, entries })) }
	}

	/// The lock is held only for the Arc clone, never across awaits.
	pub fn snapshot(&self) -> Arc<Corpus> {
		let guard = self.inner.read().unwrap_or_else(|err| err.into_inner());

		Arc::clone(&guard)
	}

	/// Swaps in a replacement corpus and returns its generation.
	pub fn replace(&self, entries: Vec<VectorStoreEntry>) -> u64 {
		let mut guard = self.inner.write().unwrap_or_else(|err| err.into_inner());
		let generation = guard.generation + 1;

		*guard = Arc::new(Corpus { generation, entries });

		generation
	}
}
