//! Prompt text for the two generation call sites. The schema section is
//! rendered from the structured catalog at the call boundary, never stored
//! as a template string.

use dcq_domain::SchemaDescriptor;
use dcq_storage::Row;
use serde_json::Value;

pub const SQL_SYSTEM_PROMPT: &str = "You are a PostgreSQL SQL generator. Only output raw SQL \
	queries with quoted column names using the table named 'info'.";

pub const EXPLANATION_SYSTEM_PROMPT: &str =
	"You are an expert AI that explains SQL results in natural language.";

pub fn render_sql_prompt(schema: &SchemaDescriptor, context: &str, question: &str) -> String {
	format!(
		"You are an AI assistant. Based on the context below, return ONLY a valid SQL query.\n\
		Wrap all column names in double quotes (e.g., \"CPUs\").\n\
		Do not use markdown or explanation. Return ONLY the raw SQL.\n\
		Note: Always use the table named \"info\". If using COUNT, always write it as \
		COUNT(DISTINCT \"column\") to avoid duplicates.\n\
		Do not invent column names; use only the columns listed below.\n\n\
		{}\n\
		Context:\n{context}\n\n\
		User Question:\n{question}\n\n\
		SQL:\n",
		schema.render_for_prompt(),
	)
}

pub fn render_explanation_prompt(question: &str, rows: &[Row]) -> String {
	let serialized =
		Value::Array(rows.iter().cloned().map(Value::Object).collect()).to_string();

	format!(
		"You are a helpful AI assistant.\n\
		You are given a user's question and a result from a SQL query.\n\
		Provide a natural language answer to explain the result clearly and concisely.\n\n\
		User Question:\n{question}\n\n\
		SQL Result:\n{serialized}\n\n\
		Answer:\n",
	)
}

/// Drops markdown code-fence markers from a generated completion. Models
/// wrap SQL in ```sql fences despite the raw-SQL instruction; the executed
/// text must contain none of them.
pub fn strip_code_fences(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut rest = text;

	while let Some(position) = rest.find("```") {
		out.push_str(&rest[..position]);
		rest = &rest[position + 3..];

		if rest.get(..3).is_some_and(|tag| tag.eq_ignore_ascii_case("sql")) {
			rest = &rest[3..];
		}
	}

	out.push_str(rest);

	out.trim().to_string()
}
