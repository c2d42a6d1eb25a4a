use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub retrieval: Retrieval,
	pub query: Query,
	pub forecast: Forecast,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub vector_store: VectorStore,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	pub query_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct VectorStore {
	pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub chat: ChatProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChatProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Retrieval {
	pub top_k: u32,
	pub max_chunk_chars: u32,
}

#[derive(Debug, Deserialize)]
pub struct Query {
	pub sql_temperature: f32,
	pub explain_temperature: f32,
	pub sql_max_tokens: u32,
	pub explain_max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct Forecast {
	pub command: String,
	#[serde(default)]
	pub args: Vec<String>,
	pub results_path: String,
	pub timeout_ms: u64,
}
