pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Vector store unavailable: {0}")]
	Unavailable(#[from] std::io::Error),
	#[error("Vector store artifact is corrupt: {0}")]
	Corrupt(#[from] serde_json::Error),
	#[error("Vector store was built for embedding space {found}, expected {expected}.")]
	SpaceMismatch { expected: String, found: String },
	#[error("Embedding dimension mismatch: expected {expected}, got {actual}.")]
	DimensionMismatch { expected: usize, actual: usize },
}
