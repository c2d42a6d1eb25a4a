//! Durable form of the corpus: a single JSON artifact holding the ordered
//! entries plus the embedding space that produced them. The only mutation is
//! wholesale replacement.

use std::{
	fs,
	io::Write,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{EmbeddingSpace, Error, Result, VectorStoreEntry};

#[derive(Debug, Serialize, Deserialize)]
struct Artifact {
	embedding_space: EmbeddingSpace,
	entries: Vec<VectorStoreEntry>,
}

pub struct FileVectorStore {
	path: PathBuf,
	space: EmbeddingSpace,
}

impl FileVectorStore {
	pub fn new(path: impl Into<PathBuf>, space: EmbeddingSpace) -> Self {
		Self { path: path.into(), space }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// A missing artifact is not an error: the service starts with an empty
	/// corpus until the first ingestion. A present-but-unparseable artifact
	/// is, as is one written in a different embedding space.
	pub fn load(&self) -> Result<Vec<VectorStoreEntry>> {
		let raw = match fs::read_to_string(&self.path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				tracing::warn!(path = %self.path.display(), "Vector store artifact missing, starting empty.");

				return Ok(Vec::new());
			},
			Err(err) => return Err(Error::Unavailable(err)),
		};
		let artifact: Artifact = serde_json::from_str(&raw)?;

		if artifact.embedding_space != self.space {
			return Err(Error::SpaceMismatch {
				expected: self.space.to_string(),
				found: artifact.embedding_space.to_string(),
			});
		}

		Ok(artifact.entries)
	}

	/// Overwrites the artifact via a temp file and rename, so a concurrent
	/// load never observes a partial write. Each save gets its own temp
	/// file, so two saves racing on the same artifact never share a
	/// half-written path; the loser's rename simply overwrites the winner's.
	pub fn save(&self, entries: &[VectorStoreEntry]) -> Result<()> {
		let artifact =
			Artifact { embedding_space: self.space.clone(), entries: entries.to_vec() };
		let rendered = serde_json::to_string(&artifact)?;
		let dir = self
			.path
			.parent()
			.filter(|parent| !parent.as_os_str().is_empty())
			.unwrap_or_else(|| Path::new("."));
		let mut tmp = tempfile::NamedTempFile::new_in(dir)?;

		tmp.write_all(rendered.as_bytes())?;
		tmp.persist(&self.path).map_err(|err| Error::Unavailable(err.error))?;

		tracing::info!(path = %self.path.display(), entries = entries.len(), "Vector store saved.");

		Ok(())
	}
}
