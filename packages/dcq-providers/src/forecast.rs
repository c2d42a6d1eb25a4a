//! Disk-usage forecasting stays an external script; this module only runs
//! the configured command and parses what it emits.

use std::{process::Stdio, time::Duration};

use serde_json::Value;
use tokio::process::Command;

use crate::{Error, Result};

/// Runs the forecast command for a single VM and parses its stdout as JSON.
pub async fn forecast_vm(cfg: &dcq_config::Forecast, vm: &str) -> Result<Value> {
	let stdout = run(cfg, vm).await?;

	serde_json::from_str(&stdout).map_err(|_| Error::InvalidResponse {
		message: format!("Forecast output is not valid JSON: {stdout}"),
	})
}

/// Runs the bulk forecast, then reads the results file the script writes.
pub async fn forecast_all(cfg: &dcq_config::Forecast) -> Result<Value> {
	run(cfg, "--all").await?;

	let raw =
		tokio::fs::read_to_string(&cfg.results_path).await.map_err(Error::ResultsUnavailable)?;

	serde_json::from_str(&raw).map_err(|_| Error::InvalidResponse {
		message: format!("Forecast results file is not valid JSON: {}", cfg.results_path),
	})
}

async fn run(cfg: &dcq_config::Forecast, final_arg: &str) -> Result<String> {
	let mut command = Command::new(&cfg.command);

	command
		.args(&cfg.args)
		.arg(final_arg)
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		// A timed-out child must not outlive the request; dropping the wait
		// future below kills it.
		.kill_on_drop(true);

	let child = command.spawn().map_err(Error::Spawn)?;
	let output = tokio::time::timeout(
		Duration::from_millis(cfg.timeout_ms),
		child.wait_with_output(),
	)
	.await
	.map_err(|_| Error::SubprocessTimeout { timeout_ms: cfg.timeout_ms })?
	.map_err(Error::Spawn)?;

	if !output.status.success() {
		return Err(Error::Subprocess {
			status: output.status.to_string(),
			stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
		});
	}

	Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
