pub mod ask;
pub mod forecast;
pub mod ingest;
pub mod prompt;

mod error;

pub use ask::{AskRequest, AskResponse};
pub use error::{Error, Result};
pub use ingest::{IngestRequest, IngestResponse};

use std::{
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex},
};

use serde_json::Value;

use dcq_config::{ChatProviderConfig, Config, EmbeddingProviderConfig, Forecast};
use dcq_retrieval::{CorpusHandle, FileVectorStore};
use dcq_storage::{Row, db::Db};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, dcq_providers::Result<Vec<Vec<f32>>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		system_prompt: &'a str,
		user_prompt: &'a str,
		temperature: f32,
		max_tokens: u32,
	) -> BoxFuture<'a, dcq_providers::Result<String>>;
}

pub trait ForecastRunner
where
	Self: Send + Sync,
{
	fn forecast_vm<'a>(
		&'a self,
		cfg: &'a Forecast,
		vm: &'a str,
	) -> BoxFuture<'a, dcq_providers::Result<Value>>;

	fn forecast_all<'a>(&'a self, cfg: &'a Forecast)
	-> BoxFuture<'a, dcq_providers::Result<Value>>;
}

/// Seam over the relational store: parameter-free generated SQL in, JSON
/// rows out.
pub trait SqlExecutor
where
	Self: Send + Sync,
{
	fn run_generated<'a>(
		&'a self,
		sql: &'a str,
	) -> BoxFuture<'a, dcq_storage::Result<Vec<Row>>>;

	fn vm_names<'a>(&'a self) -> BoxFuture<'a, dcq_storage::Result<Vec<String>>>;
}

impl SqlExecutor for Db {
	fn run_generated<'a>(
		&'a self,
		sql: &'a str,
	) -> BoxFuture<'a, dcq_storage::Result<Vec<Row>>> {
		Box::pin(Db::run_generated(self, sql))
	}

	fn vm_names<'a>(&'a self) -> BoxFuture<'a, dcq_storage::Result<Vec<String>>> {
		Box::pin(Db::vm_names(self))
	}
}

pub struct HttpEmbedding;
impl EmbeddingProvider for HttpEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, dcq_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(dcq_providers::embedding::embed(cfg, texts))
	}
}

pub struct HttpChat;
impl ChatProvider for HttpChat {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		system_prompt: &'a str,
		user_prompt: &'a str,
		temperature: f32,
		max_tokens: u32,
	) -> BoxFuture<'a, dcq_providers::Result<String>> {
		Box::pin(dcq_providers::chat::complete(
			cfg,
			system_prompt,
			user_prompt,
			temperature,
			max_tokens,
		))
	}
}

pub struct CommandForecast;
impl ForecastRunner for CommandForecast {
	fn forecast_vm<'a>(
		&'a self,
		cfg: &'a Forecast,
		vm: &'a str,
	) -> BoxFuture<'a, dcq_providers::Result<Value>> {
		Box::pin(dcq_providers::forecast::forecast_vm(cfg, vm))
	}

	fn forecast_all<'a>(
		&'a self,
		cfg: &'a Forecast,
	) -> BoxFuture<'a, dcq_providers::Result<Value>> {
		Box::pin(dcq_providers::forecast::forecast_all(cfg))
	}
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub chat: Arc<dyn ChatProvider>,
	pub forecast: Arc<dyn ForecastRunner>,
}

impl Providers {
	/// The production wiring: HTTP providers plus the forecast subprocess.
	pub fn external() -> Self {
		Self {
			embedding: Arc::new(HttpEmbedding),
			chat: Arc::new(HttpChat),
			forecast: Arc::new(CommandForecast),
		}
	}
}

pub struct QueryService {
	pub cfg: Config,
	pub corpus: CorpusHandle,
	pub store: FileVectorStore,
	pub providers: Providers,
	pub executor: Arc<dyn SqlExecutor>,
	/// Serializes artifact save plus corpus swap, so the durable copy and
	/// the in-memory view always publish in the same order.
	pub(crate) ingest_lock: Mutex<()>,
}

impl QueryService {
	pub fn new(
		cfg: Config,
		store: FileVectorStore,
		corpus: CorpusHandle,
		providers: Providers,
		executor: Arc<dyn SqlExecutor>,
	) -> Self {
		Self { cfg, corpus, store, providers, executor, ingest_lock: Mutex::new(()) }
	}
}
