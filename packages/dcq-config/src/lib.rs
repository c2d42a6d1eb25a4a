mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	ChatProviderConfig, Config, EmbeddingProviderConfig, Forecast, Postgres, Providers, Query,
	Retrieval, Service, Storage, VectorStore,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.postgres.query_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.query_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.vector_store.path.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.vector_store.path must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 || cfg.providers.chat.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "provider timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.max_chunk_chars == 0 {
		return Err(Error::Validation {
			message: "retrieval.max_chunk_chars must be greater than zero.".to_string(),
		});
	}
	for (name, value) in [
		("query.sql_temperature", cfg.query.sql_temperature),
		("query.explain_temperature", cfg.query.explain_temperature),
	] {
		if !value.is_finite() || !(0.0..=2.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{name} must be in the range 0.0-2.0."),
			});
		}
	}
	if cfg.query.sql_max_tokens == 0 || cfg.query.explain_max_tokens == 0 {
		return Err(Error::Validation {
			message: "query max_tokens values must be greater than zero.".to_string(),
		});
	}
	if cfg.forecast.command.trim().is_empty() {
		return Err(Error::Validation {
			message: "forecast.command must be non-empty.".to_string(),
		});
	}
	if cfg.forecast.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "forecast.timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	normalize_endpoint(&mut cfg.providers.embedding.api_base, &mut cfg.providers.embedding.path);
	normalize_endpoint(&mut cfg.providers.chat.api_base, &mut cfg.providers.chat.path);
}

fn normalize_endpoint(api_base: &mut String, path: &mut String) {
	while api_base.ends_with('/') {
		api_base.pop();
	}
	if !path.starts_with('/') {
		path.insert(0, '/');
	}
}
