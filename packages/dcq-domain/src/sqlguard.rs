//! Allow-list validation for model-generated SQL. The generated text is
//! untrusted input: it is only executed after passing these checks, and a
//! violation is surfaced to the caller as a rejected generation rather than
//! being run or silently rewritten.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::SchemaDescriptor;

static QUOTED_IDENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("Identifier pattern must compile."));
static SINGLE_QUOTED: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"'[^']*'").expect("Literal pattern must compile."));

const FORBIDDEN_KEYWORDS: &[&str] = &[
	"insert", "update", "delete", "drop", "alter", "create", "truncate", "grant", "revoke",
	"copy", "into", "call", "execute", "merge", "vacuum", "set",
];

#[derive(Debug, thiserror::Error)]
pub enum Violation {
	#[error("Generated SQL is empty.")]
	Empty,
	#[error("Generated SQL must be a single statement.")]
	MultipleStatements,
	#[error("Generated SQL must not contain comments.")]
	Comment,
	#[error("Generated SQL must be a SELECT statement.")]
	NotSelect,
	#[error("Forbidden keyword in generated SQL: {keyword}.")]
	ForbiddenKeyword { keyword: String },
	#[error("Unknown identifier in generated SQL: {identifier}.")]
	UnknownIdentifier { identifier: String },
}

pub fn validate(sql: &str, schema: &SchemaDescriptor) -> Result<(), Violation> {
	let trimmed = sql.trim().trim_end_matches(';').trim();

	if trimmed.is_empty() {
		return Err(Violation::Empty);
	}

	// Statement, comment, and keyword scanning all work on a copy with
	// quoted regions blanked out, so column names and string literals
	// cannot trip or hide a violation.
	let masked = mask_quoted(trimmed);

	if masked.contains(';') {
		return Err(Violation::MultipleStatements);
	}
	if masked.contains("--") || masked.contains("/*") {
		return Err(Violation::Comment);
	}

	let lowered = masked.to_lowercase();
	let mut words = lowered.split(|c: char| !c.is_alphanumeric() && c != '_').filter(|w| !w.is_empty());

	match words.next() {
		Some("select") | Some("with") => (),
		_ => return Err(Violation::NotSelect),
	}

	for word in words {
		if FORBIDDEN_KEYWORDS.contains(&word) {
			return Err(Violation::ForbiddenKeyword { keyword: word.to_string() });
		}
	}

	let literal_free = SINGLE_QUOTED.replace_all(trimmed, "''");

	for capture in QUOTED_IDENT.captures_iter(&literal_free) {
		let identifier = &capture[1];

		if !schema.is_known_table(identifier)
			&& !schema.is_known_column(identifier)
			&& !is_alias(identifier, &literal_free)
		{
			return Err(Violation::UnknownIdentifier { identifier: identifier.to_string() });
		}
	}

	Ok(())
}

/// A quoted identifier that first appears right after `AS` is an output alias
/// chosen by the model, not a schema reference.
fn is_alias(identifier: &str, sql: &str) -> bool {
	let needle = format!("\"{identifier}\"");
	let lowered = sql.to_lowercase();

	match lowered.find(&needle.to_lowercase()) {
		Some(position) => lowered[..position].trim_end().ends_with(" as"),
		None => false,
	}
}

fn mask_quoted(sql: &str) -> String {
	let without_literals = SINGLE_QUOTED.replace_all(sql, " ");

	QUOTED_IDENT.replace_all(&without_literals, " ").into_owned()
}
