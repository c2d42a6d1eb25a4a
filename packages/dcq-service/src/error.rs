pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("No context available: {message}")]
	NoContext { message: String },
	#[error("Embedding dimension mismatch: expected {expected}, got {actual}.")]
	DimensionMismatch { expected: usize, actual: usize },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Vector store artifact is corrupt: {message}")]
	CorruptArtifact { message: String },
	#[error("Provider unavailable: {message}")]
	ProviderUnavailable { message: String },
	#[error("Provider rejected: {message}")]
	ProviderRejected { message: String },
	#[error("Query execution failed: {message}")]
	Query { message: String },
}

impl From<dcq_retrieval::Error> for Error {
	fn from(err: dcq_retrieval::Error) -> Self {
		match err {
			dcq_retrieval::Error::Unavailable(inner) =>
				Self::Storage { message: inner.to_string() },
			dcq_retrieval::Error::Corrupt(inner) =>
				Self::CorruptArtifact { message: inner.to_string() },
			dcq_retrieval::Error::SpaceMismatch { .. } =>
				Self::CorruptArtifact { message: err.to_string() },
			dcq_retrieval::Error::DimensionMismatch { expected, actual } =>
				Self::DimensionMismatch { expected, actual },
		}
	}
}

impl From<dcq_providers::Error> for Error {
	fn from(err: dcq_providers::Error) -> Self {
		match err {
			dcq_providers::Error::Transport(_)
			| dcq_providers::Error::Spawn(_)
			| dcq_providers::Error::SubprocessTimeout { .. }
			| dcq_providers::Error::ResultsUnavailable(_) =>
				Self::ProviderUnavailable { message: err.to_string() },
			dcq_providers::Error::Status { .. }
			| dcq_providers::Error::SerdeJson(_)
			| dcq_providers::Error::InvalidHeaderName(_)
			| dcq_providers::Error::InvalidHeaderValue(_)
			| dcq_providers::Error::InvalidResponse { .. }
			| dcq_providers::Error::Subprocess { .. } =>
				Self::ProviderRejected { message: err.to_string() },
		}
	}
}

impl From<dcq_storage::Error> for Error {
	fn from(err: dcq_storage::Error) -> Self {
		Self::Query { message: err.to_string() }
	}
}
