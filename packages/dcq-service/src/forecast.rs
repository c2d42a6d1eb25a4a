use serde_json::Value;

use crate::{Error, QueryService, Result};

impl QueryService {
	/// Forecast for a single VM, proxied to the external runner.
	pub async fn forecast_vm(&self, vm: &str) -> Result<Value> {
		let vm = vm.trim();

		if vm.is_empty() {
			return Err(Error::InvalidRequest { message: "Missing VM name.".to_string() });
		}

		Ok(self.providers.forecast.forecast_vm(&self.cfg.forecast, vm).await?)
	}

	/// Bulk forecast across all VMs.
	pub async fn forecast_all(&self) -> Result<Value> {
		Ok(self.providers.forecast.forecast_all(&self.cfg.forecast).await?)
	}

	/// Distinct VM names for the forecast picker.
	pub async fn vm_names(&self) -> Result<Vec<String>> {
		Ok(self.executor.vm_names().await?)
	}
}
