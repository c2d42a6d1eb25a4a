pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Transport-level failure: the endpoint could not be reached or timed
	/// out. Distinct from `Status` so callers can tell an unreachable
	/// collaborator from one that rejected the request.
	#[error(transparent)]
	Transport(#[from] reqwest::Error),
	#[error("Provider returned status {status}: {body}")]
	Status { status: u16, body: String },
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Forecast runner failed to start: {0}")]
	Spawn(#[source] std::io::Error),
	#[error("Forecast runner exited with {status}: {stderr}")]
	Subprocess { status: String, stderr: String },
	#[error("Forecast runner timed out after {timeout_ms} ms.")]
	SubprocessTimeout { timeout_ms: u64 },
	#[error("Forecast results unavailable: {0}")]
	ResultsUnavailable(#[source] std::io::Error),
}
