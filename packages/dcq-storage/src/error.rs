#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Query timed out after {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
}
