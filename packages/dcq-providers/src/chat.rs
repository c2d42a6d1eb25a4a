use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// One chat-completion round trip. Temperature and token budget vary by
/// call site (deterministic for SQL generation, stochastic for the
/// explanation), so both are parameters rather than config.
pub async fn complete(
	cfg: &dcq_config::ChatProviderConfig,
	system_prompt: &str,
	user_prompt: &str,
	temperature: f32,
	max_tokens: u32,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": temperature,
		"max_tokens": max_tokens,
		"messages": [
			{ "role": "system", "content": system_prompt },
			{ "role": "user", "content": user_prompt },
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = crate::check_status(res).await?.json().await?;

	parse_completion_response(json)
}

fn parse_completion_response(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing message content.".to_string(),
		})?;

	Ok(content.trim().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_and_trims_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "  SELECT 1  \n" } }
			]
		});

		assert_eq!(parse_completion_response(json).expect("parse failed"), "SELECT 1");
	}

	#[test]
	fn empty_choices_is_invalid() {
		let err = parse_completion_response(serde_json::json!({ "choices": [] }))
			.expect_err("Empty choices must fail.");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}
}
