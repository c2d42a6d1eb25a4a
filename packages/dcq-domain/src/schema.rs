//! Static catalog of the tables and columns generated SQL is allowed to
//! touch. The catalog is structured data; it is rendered into prompt text at
//! the call boundary only, so a schema change is a data update here rather
//! than an edit scattered across prompt templates.

/// Bumped whenever the column catalog or allowed values change.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug)]
pub struct SchemaDescriptor {
	pub version: u32,
	pub tables: &'static [TableDescriptor],
}

#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
	pub name: &'static str,
	pub columns: &'static [&'static str],
	/// Enumerated values for categorical columns, keyed by column name.
	pub allowed_values: &'static [(&'static str, &'static [&'static str])],
}

impl SchemaDescriptor {
	pub fn is_known_table(&self, name: &str) -> bool {
		self.tables.iter().any(|table| table.name == name)
	}

	pub fn is_known_column(&self, name: &str) -> bool {
		self.tables.iter().any(|table| table.columns.contains(&name))
	}

	/// Renders the catalog as prompt text: one table per paragraph, quoted
	/// column names, then the enumerated values for categorical columns.
	pub fn render_for_prompt(&self) -> String {
		let mut out = String::new();

		for table in self.tables {
			out.push_str(&format!("Table \"{}\"\nAvailable Columns:\n", table.name));

			let quoted: Vec<String> =
				table.columns.iter().map(|column| format!("\"{column}\"")).collect();

			out.push_str(&quoted.join(", "));
			out.push('\n');

			if !table.allowed_values.is_empty() {
				out.push_str("Allowed Values:\n");

				for (column, values) in table.allowed_values {
					let rendered: Vec<String> =
						values.iter().map(|value| format!("\"{value}\"")).collect();

					out.push_str(&format!("- \"{column}\": {}\n", rendered.join(", ")));
				}
			}
		}

		out
	}
}

/// The datacenter-inventory catalog: one `info` table holding the VMware
/// inventory export, one row per VM per snapshot date.
pub fn catalog() -> &'static SchemaDescriptor {
	&INVENTORY
}

static INVENTORY: SchemaDescriptor =
	SchemaDescriptor { version: SCHEMA_VERSION, tables: &[INFO_TABLE] };

static INFO_TABLE: TableDescriptor = TableDescriptor {
	name: "info",
	columns: &[
		"VM",
		"Powerstate",
		"Template",
		"SRM_Placeholder",
		"Config_status",
		"DNS_Name",
		"Connection_state",
		"Guest_state",
		"Heartbeat",
		"Consolidation_Needed",
		"PowerOn",
		"Suspend_time",
		"Creation_date",
		"Change_Version",
		"CPUs",
		"Memory",
		"NICs",
		"Disks",
		"min_Required_EVC_Mode_Key",
		"Latency_Sensitivity",
		"EnableUUID",
		"CBT",
		"Primary_IP_Address",
		"Network_#1",
		"Network_#2",
		"Network_#3",
		"Network_#4",
		"Network_#5",
		"Network_#6",
		"Network_#7",
		"Network_#8",
		"Num_Monitors",
		"Video_Ram_KiB",
		"Resource_pool",
		"Folder",
		"vApp",
		"DAS_protection",
		"FT_State",
		"FT_Latency",
		"FT_Bandwidth",
		"FT_Sec._Latency",
		"Provisioned_MiB",
		"In_Use_MiB",
		"Unshared_MiB",
		"HA_Restart_Priority",
		"HA_Isolation_Response",
		"HA_VM_Monitoring",
		"Cluster_rule(s)",
		"Cluster_rule_name(s)",
		"Boot_Required",
		"Boot_delay",
		"Boot_retry_delay",
		"Boot_retry_enabled",
		"Boot_BIOS_setup",
		"Firmware",
		"HW_version",
		"HW_upgrade_status",
		"HW_upgrade_policy",
		"HW_target",
		"Path",
		"Log_directory",
		"Snapshot_directory",
		"Suspend_directory",
		"Annotation",
		"Datacenter",
		"Cluster",
		"Host",
		"OS_according_to_the_configuration_file",
		"OS_according_to_the_VMware_Tools",
		"VM_ID",
		"VM_UUID",
		"VI_SDK_Server_type",
		"VI_SDK_API_Version",
		"VI_SDK_Server",
		"VI_SDK_UUID",
		"Date",
		"Year",
		"Quarter",
		"Month",
		"Day",
	],
	allowed_values: &[
		("Powerstate", &["poweredOn", "poweredOff"]),
		("Connection_state", &["connected", "disconnected"]),
		("Guest_state", &["running", "notRunning"]),
	],
};
