use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use serde_json::Value;

use dcq_config::{
	ChatProviderConfig, Config, EmbeddingProviderConfig, Forecast, Postgres, Query, Retrieval,
	Service, Storage, VectorStore,
};
use dcq_retrieval::{CorpusHandle, EmbeddingSpace, FileVectorStore, VectorStoreEntry};
use dcq_service::{
	AskRequest, BoxFuture, ChatProvider, EmbeddingProvider, Error, ForecastRunner,
	IngestRequest, Providers, QueryService, SqlExecutor,
};
use dcq_storage::Row;

const DIMENSIONS: u32 = 3;

fn test_config(store_path: &std::path::Path) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:5001".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres {
				dsn: "postgres://unused".to_string(),
				pool_max_conns: 1,
				query_timeout_ms: 1_000,
			},
			vector_store: VectorStore { path: store_path.display().to_string() },
		},
		providers: dcq_config::Providers {
			embedding: EmbeddingProviderConfig {
				api_base: "http://127.0.0.1:1234".to_string(),
				api_key: String::new(),
				path: "/v1/embeddings".to_string(),
				model: "test-embedding".to_string(),
				dimensions: DIMENSIONS,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
			chat: ChatProviderConfig {
				api_base: "http://127.0.0.1:1234".to_string(),
				api_key: String::new(),
				path: "/v1/chat/completions".to_string(),
				model: "test-chat".to_string(),
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
		},
		retrieval: Retrieval { top_k: 2, max_chunk_chars: 500 },
		query: Query {
			sql_temperature: 0.0,
			explain_temperature: 0.5,
			sql_max_tokens: 256,
			explain_max_tokens: 512,
		},
		forecast: Forecast {
			command: "true".to_string(),
			args: Vec::new(),
			results_path: "unused.json".to_string(),
			timeout_ms: 1_000,
		},
	}
}

struct StaticEmbedding {
	calls: Arc<AtomicUsize>,
}
impl StaticEmbedding {
	fn new() -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)) }
	}
}
impl EmbeddingProvider for StaticEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, dcq_providers::Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let dim = cfg.dimensions as usize;
		let vectors = vec![vec![0.5; dim]; texts.len()];

		Box::pin(async move { Ok(vectors) })
	}
}

struct WrongDimensionEmbedding;
impl EmbeddingProvider for WrongDimensionEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, dcq_providers::Result<Vec<Vec<f32>>>> {
		let vectors = vec![vec![0.5; 7]; texts.len()];

		Box::pin(async move { Ok(vectors) })
	}
}

struct ScriptedChat {
	calls: Arc<AtomicUsize>,
	responses: Mutex<Vec<String>>,
}
impl ScriptedChat {
	fn new(responses: &[&str]) -> Self {
		let mut scripted: Vec<String> = responses.iter().map(|s| s.to_string()).collect();

		scripted.reverse();

		Self { calls: Arc::new(AtomicUsize::new(0)), responses: Mutex::new(scripted) }
	}

	fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl ChatProvider for ScriptedChat {
	fn complete<'a>(
		&'a self,
		_cfg: &'a ChatProviderConfig,
		_system_prompt: &'a str,
		_user_prompt: &'a str,
		_temperature: f32,
		_max_tokens: u32,
	) -> BoxFuture<'a, dcq_providers::Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let next = self.responses.lock().unwrap().pop().unwrap_or_default();

		Box::pin(async move { Ok(next) })
	}
}

struct UnusedForecast;
impl ForecastRunner for UnusedForecast {
	fn forecast_vm<'a>(
		&'a self,
		_cfg: &'a Forecast,
		_vm: &'a str,
	) -> BoxFuture<'a, dcq_providers::Result<Value>> {
		Box::pin(async move { Ok(Value::Null) })
	}

	fn forecast_all<'a>(
		&'a self,
		_cfg: &'a Forecast,
	) -> BoxFuture<'a, dcq_providers::Result<Value>> {
		Box::pin(async move { Ok(Value::Null) })
	}
}

struct StubExecutor {
	rows: Vec<Row>,
	error: Option<String>,
	executed: Mutex<Vec<String>>,
}
impl StubExecutor {
	fn returning(rows: Vec<Row>) -> Arc<Self> {
		Arc::new(Self { rows, error: None, executed: Mutex::new(Vec::new()) })
	}

	fn failing(message: &str) -> Arc<Self> {
		Arc::new(Self {
			rows: Vec::new(),
			error: Some(message.to_string()),
			executed: Mutex::new(Vec::new()),
		})
	}

	fn executed(&self) -> Vec<String> {
		self.executed.lock().unwrap().clone()
	}
}
impl SqlExecutor for StubExecutor {
	fn run_generated<'a>(
		&'a self,
		sql: &'a str,
	) -> BoxFuture<'a, dcq_storage::Result<Vec<Row>>> {
		self.executed.lock().unwrap().push(sql.to_string());

		let result = match &self.error {
			Some(message) =>
				Err(dcq_storage::Error::Sqlx(sqlx::Error::Protocol(message.clone()))),
			None => Ok(self.rows.clone()),
		};

		Box::pin(async move { result })
	}

	fn vm_names<'a>(&'a self) -> BoxFuture<'a, dcq_storage::Result<Vec<String>>> {
		Box::pin(async move { Ok(vec!["vm-a".to_string(), "vm-b".to_string()]) })
	}
}

fn count_row(column: &str, value: i64) -> Row {
	let mut row = Row::new();

	row.insert(column.to_string(), serde_json::json!(value));

	row
}

fn context_entries() -> Vec<VectorStoreEntry> {
	vec![
		VectorStoreEntry {
			chunk: "The inventory export lists one row per VM per day.".to_string(),
			embedding: vec![0.5, 0.5, 0.5],
		},
		VectorStoreEntry {
			chunk: "Disk usage is reported in MiB.".to_string(),
			embedding: vec![0.1, 0.9, 0.2],
		},
	]
}

struct Harness {
	service: QueryService,
	embedding_calls: Arc<AtomicUsize>,
	chat: Arc<ScriptedChat>,
	executor: Arc<StubExecutor>,
	_dir: tempfile::TempDir,
}

fn harness(
	entries: Vec<VectorStoreEntry>,
	chat_responses: &[&str],
	executor: Arc<StubExecutor>,
) -> Harness {
	let dir = tempfile::tempdir().expect("Temp dir must be created.");
	let path = dir.path().join("store.json");
	let cfg = test_config(&path);
	let store = FileVectorStore::new(&path, EmbeddingSpace::new("test-embedding", DIMENSIONS));
	let embedding = Arc::new(StaticEmbedding::new());
	let embedding_calls = Arc::clone(&embedding.calls);
	let chat = Arc::new(ScriptedChat::new(chat_responses));
	let providers = Providers {
		embedding,
		chat: Arc::clone(&chat) as Arc<dyn ChatProvider>,
		forecast: Arc::new(UnusedForecast),
	};
	let service = QueryService::new(
		cfg,
		store,
		CorpusHandle::new(entries),
		providers,
		Arc::clone(&executor) as Arc<dyn SqlExecutor>,
	);

	Harness { service, embedding_calls, chat, executor, _dir: dir }
}

#[tokio::test]
async fn predefined_hit_skips_generation_entirely() {
	let executor = StubExecutor::returning(vec![count_row("powered_on_vms", 12)]);
	let harness = harness(Vec::new(), &[], Arc::clone(&executor));
	let response = harness
		.service
		.ask(AskRequest { question: "count powered on".to_string() })
		.await
		.expect("Predefined path must succeed.");

	let executed = executor.executed();

	assert_eq!(executed.len(), 1);
	assert!(executed[0].contains("COUNT(DISTINCT \"VM\")"));
	assert!(executed[0].contains("'poweredOn'"));
	assert_eq!(
		response.answer,
		"This is the number of distinct VMs currently reported as poweredOn."
	);
	assert_eq!(response.rows.expect("Rows must be present.").len(), 1);
	assert_eq!(harness.chat.count(), 0);
	assert_eq!(harness.embedding_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_corpus_is_no_context_with_no_generation_call() {
	let executor = StubExecutor::returning(Vec::new());
	let harness = harness(Vec::new(), &[], Arc::clone(&executor));
	let err = harness
		.service
		.ask(AskRequest { question: "which folder holds the oldest snapshot".to_string() })
		.await
		.expect_err("Empty corpus must fail.");

	assert!(matches!(err, Error::NoContext { .. }));
	assert_eq!(harness.chat.count(), 0);
	assert!(executor.executed().is_empty());
}

#[tokio::test]
async fn code_fences_are_stripped_before_execution() {
	let executor = StubExecutor::returning(vec![count_row("total_vms", 42)]);
	let harness = harness(
		context_entries(),
		&["```sql\nSELECT COUNT(DISTINCT \"VM\") AS \"total\" FROM info\n```", "There are 42 VMs."],
		Arc::clone(&executor),
	);
	let response = harness
		.service
		.ask(AskRequest { question: "what does the export contain".to_string() })
		.await
		.expect("Generated path must succeed.");

	let executed = executor.executed();

	assert_eq!(executed.len(), 1);
	assert!(!executed[0].contains('`'));
	assert!(executed[0].starts_with("SELECT"));
	assert_eq!(response.answer, "There are 42 VMs.");
	assert_eq!(harness.chat.count(), 2);
	assert_eq!(harness.embedding_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn execution_failure_skips_the_explanation_call() {
	let executor = StubExecutor::failing("column \"Power_State\" does not exist");
	let harness = harness(
		context_entries(),
		&["SELECT \"VM\" FROM info", "never returned"],
		Arc::clone(&executor),
	);
	let err = harness
		.service
		.ask(AskRequest { question: "list the machines by state".to_string() })
		.await
		.expect_err("Execution failure must surface.");

	match err {
		Error::Query { message } => assert!(message.contains("Power_State")),
		other => panic!("Expected Query error, got {other:?}"),
	}

	// SQL generation happened, the explanation call did not.
	assert_eq!(harness.chat.count(), 1);
}

#[tokio::test]
async fn guarded_sql_is_rejected_without_execution() {
	let executor = StubExecutor::returning(Vec::new());
	let harness =
		harness(context_entries(), &["DROP TABLE info", "never returned"], Arc::clone(&executor));
	let err = harness
		.service
		.ask(AskRequest { question: "tidy up the export table".to_string() })
		.await
		.expect_err("Guard must reject the statement.");

	assert!(matches!(err, Error::ProviderRejected { .. }));
	assert!(executor.executed().is_empty());
	assert_eq!(harness.chat.count(), 1);
}

#[tokio::test]
async fn blank_question_is_invalid() {
	let executor = StubExecutor::returning(Vec::new());
	let harness = harness(Vec::new(), &[], Arc::clone(&executor));
	let err = harness
		.service
		.ask(AskRequest { question: "   ".to_string() })
		.await
		.expect_err("Blank question must fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn ingest_persists_and_publishes_a_new_generation() {
	let executor = StubExecutor::returning(Vec::new());
	let harness = harness(Vec::new(), &[], executor);
	let response = harness
		.service
		.ingest(IngestRequest {
			text: "First sentence about VMs. Second sentence about disks.".to_string(),
			source: Some("inventory.pdf".to_string()),
		})
		.await
		.expect("Ingestion must succeed.");

	assert!(response.chunks >= 1);
	assert_eq!(response.generation, 1);

	let snapshot = harness.service.corpus.snapshot();

	assert_eq!(snapshot.generation, 1);
	assert_eq!(snapshot.entries.len(), response.chunks);

	let persisted = harness.service.store.load().expect("Artifact must load.");

	assert_eq!(persisted.len(), response.chunks);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_ingests_keep_disk_and_memory_aligned() {
	let executor = StubExecutor::returning(Vec::new());
	let harness = harness(Vec::new(), &[], executor);
	let service = &harness.service;
	let (first, second) = tokio::join!(
		service.ingest(IngestRequest {
			text: "Alpha sentence about VMs.".to_string(),
			source: None,
		}),
		service.ingest(IngestRequest {
			text: "Beta sentence about disks.".to_string(),
			source: None,
		}),
	);

	first.expect("First ingest must succeed.");
	second.expect("Second ingest must succeed.");

	let snapshot = harness.service.corpus.snapshot();

	assert_eq!(snapshot.generation, 2);

	// The artifact on disk matches whichever corpus won the swap.
	let persisted = harness.service.store.load().expect("Artifact must load.");

	assert_eq!(persisted.len(), snapshot.entries.len());
	assert_eq!(persisted[0].chunk, snapshot.entries[0].chunk);
}

#[tokio::test]
async fn ingest_rejects_mismatched_embedding_dimensions() {
	let executor = StubExecutor::returning(Vec::new());
	let mut harness = harness(Vec::new(), &[], executor);

	harness.service.providers.embedding = Arc::new(WrongDimensionEmbedding);

	let err = harness
		.service
		.ingest(IngestRequest { text: "Some text.".to_string(), source: None })
		.await
		.expect_err("Dimension mismatch must fail.");

	assert!(matches!(err, Error::DimensionMismatch { expected: 3, actual: 7 }));
}

#[tokio::test]
async fn ingest_rejects_empty_text() {
	let executor = StubExecutor::returning(Vec::new());
	let harness = harness(Vec::new(), &[], executor);
	let err = harness
		.service
		.ingest(IngestRequest { text: " \n ".to_string(), source: None })
		.await
		.expect_err("Empty text must fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn forecast_requires_a_vm_name() {
	let executor = StubExecutor::returning(Vec::new());
	let harness = harness(Vec::new(), &[], executor);
	let err = harness.service.forecast_vm("  ").await.expect_err("Blank VM must fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn vm_names_come_from_the_executor() {
	let executor = StubExecutor::returning(Vec::new());
	let harness = harness(Vec::new(), &[], executor);
	let names = harness.service.vm_names().await.expect("Listing must succeed.");

	assert_eq!(names, vec!["vm-a".to_string(), "vm-b".to_string()]);
}
