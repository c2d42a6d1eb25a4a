use serde::{Deserialize, Serialize};

use dcq_domain::{catalog, match_predefined, sqlguard};
use dcq_storage::Row;

use crate::{Error, QueryService, Result, prompt};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
	pub question: String,
}

/// The answer envelope: a natural-language answer plus the rows it was
/// derived from. Never returned partially; a failure is an error instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
	pub answer: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rows: Option<Vec<Row>>,
}

impl QueryService {
	/// Answers a question, trying the predefined rules first and falling
	/// back to retrieval plus SQL generation. Each external call is made at
	/// most once; the first failure is surfaced to the caller.
	pub async fn ask(&self, req: AskRequest) -> Result<AskResponse> {
		let question = req.question.trim();

		if question.is_empty() {
			return Err(Error::InvalidRequest { message: "question is required.".to_string() });
		}

		// Cheap deterministic path: fixed SQL, static explanation, no
		// generation calls at all.
		if let Some(rule) = match_predefined(question) {
			tracing::info!(rule = rule.name, "Predefined rule matched.");

			let rows = self.executor.run_generated(rule.sql).await?;

			return Ok(AskResponse { answer: rule.explanation.to_string(), rows: Some(rows) });
		}

		let snapshot = self.corpus.snapshot();

		if snapshot.entries.is_empty() {
			return Err(Error::NoContext {
				message: "Vector store is empty. Upload a document first.".to_string(),
			});
		}

		let query_texts = [question.to_string()];
		let embeddings =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &query_texts).await?;
		let query_embedding = embeddings.into_iter().next().ok_or_else(|| {
			Error::ProviderRejected { message: "Embedding response was empty.".to_string() }
		})?;

		let context_chunks = dcq_retrieval::rank(
			&query_embedding,
			&snapshot.entries,
			self.cfg.retrieval.top_k as usize,
		)?;
		let context = context_chunks.join("\n\n");
		let schema = catalog();
		let sql_prompt = prompt::render_sql_prompt(schema, &context, question);
		let raw_sql = self
			.providers
			.chat
			.complete(
				&self.cfg.providers.chat,
				prompt::SQL_SYSTEM_PROMPT,
				&sql_prompt,
				self.cfg.query.sql_temperature,
				self.cfg.query.sql_max_tokens,
			)
			.await?;
		let sql = prompt::strip_code_fences(&raw_sql);

		sqlguard::validate(&sql, schema).map_err(|err| Error::ProviderRejected {
			message: format!("Generated SQL was rejected: {err}"),
		})?;
		tracing::info!(corpus_generation = snapshot.generation, "Executing generated SQL.");

		let rows = self.executor.run_generated(&sql).await?;
		let explanation_prompt = prompt::render_explanation_prompt(question, &rows);
		let answer = self
			.providers
			.chat
			.complete(
				&self.cfg.providers.chat,
				prompt::EXPLANATION_SYSTEM_PROMPT,
				&explanation_prompt,
				self.cfg.query.explain_temperature,
				self.cfg.query.explain_max_tokens,
			)
			.await?;

		Ok(AskResponse { answer, rows: Some(rows) })
	}
}
