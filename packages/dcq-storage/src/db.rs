use std::{future::Future, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Error, Result, Row, rows};

pub struct Db {
	pub pool: PgPool,
	query_timeout_ms: u64,
}

impl Db {
	pub async fn connect(cfg: &dcq_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.acquire_timeout(Duration::from_millis(cfg.query_timeout_ms))
			.connect(&cfg.dsn)
			.await?;

		Ok(Self { pool, query_timeout_ms: cfg.query_timeout_ms })
	}

	/// Executes SQL produced by the generation pipeline. The text has already
	/// passed the SELECT-only guard; here it runs verbatim, bounded by the
	/// configured per-query timeout. The connection comes from the pool and
	/// goes back on every exit path.
	pub async fn run_generated(&self, sql: &str) -> Result<Vec<Row>> {
		let fetched =
			bounded(self.query_timeout_ms, sqlx::query(sql).fetch_all(&self.pool)).await?;

		Ok(fetched.iter().map(rows::row_to_json).collect())
	}

	/// Distinct VM names for the forecast picker.
	pub async fn vm_names(&self) -> Result<Vec<String>> {
		let names: Vec<String> = bounded(
			self.query_timeout_ms,
			sqlx::query_scalar(
				"SELECT DISTINCT \"VM\" FROM info WHERE \"VM\" IS NOT NULL ORDER BY \"VM\" ASC",
			)
			.fetch_all(&self.pool),
		)
		.await?;

		Ok(names)
	}
}

/// Every query against the pool goes through the same per-query timeout; a
/// stalled database turns into `Timeout` instead of a hung request.
async fn bounded<T>(
	timeout_ms: u64,
	query: impl Future<Output = Result<T, sqlx::Error>>,
) -> Result<T> {
	tokio::time::timeout(Duration::from_millis(timeout_ms), query)
		.await
		.map_err(|_| Error::Timeout { timeout_ms })?
		.map_err(Error::from)
}
