//! Deterministic shortcuts for common inventory questions. A rule fires when
//! any of its keyword phrases appears in the lowercased question; the first
//! rule in declaration order wins, so the order of `RULES` is part of the
//! contract. A hit bypasses retrieval and SQL generation entirely.

#[derive(Debug)]
pub struct PredefinedRule {
	pub name: &'static str,
	pub keywords: &'static [&'static str],
	pub sql: &'static str,
	pub explanation: &'static str,
}

/// More specific rules come first: the powered-on/off counters must precede
/// the total-VM counter, whose "how many vms" phrase is a substring of
/// questions the former should own.
pub const RULES: &[PredefinedRule] = &[
	PredefinedRule {
		name: "powered_on_count",
		keywords: &["count powered on", "how many powered on", "powered on", "poweredon"],
		sql: "SELECT COUNT(DISTINCT \"VM\") AS \"powered_on_vms\" FROM info WHERE \"Powerstate\" = 'poweredOn'",
		explanation: "This is the number of distinct VMs currently reported as poweredOn.",
	},
	PredefinedRule {
		name: "powered_off_count",
		keywords: &["count powered off", "how many powered off", "powered off", "poweredoff"],
		sql: "SELECT COUNT(DISTINCT \"VM\") AS \"powered_off_vms\" FROM info WHERE \"Powerstate\" = 'poweredOff'",
		explanation: "This is the number of distinct VMs currently reported as poweredOff.",
	},
	PredefinedRule {
		name: "highest_memory",
		keywords: &["highest memory", "most memory", "largest memory"],
		sql: "SELECT \"VM\", \"Memory\" FROM info ORDER BY \"Memory\" DESC LIMIT 1",
		explanation: "This is the VM with the highest configured memory in the latest inventory.",
	},
	PredefinedRule {
		name: "highest_cpu",
		keywords: &["highest cpu", "most cpus", "most cpu"],
		sql: "SELECT \"VM\", \"CPUs\" FROM info ORDER BY \"CPUs\" DESC LIMIT 1",
		explanation: "This is the VM with the most configured CPUs in the latest inventory.",
	},
	PredefinedRule {
		name: "highest_disk_usage",
		keywords: &["highest disk", "most disk", "largest disk"],
		sql: "SELECT \"VM\", \"In_Use_MiB\" FROM info ORDER BY \"In_Use_MiB\" DESC LIMIT 1",
		explanation: "This is the VM with the highest in-use disk space, in MiB.",
	},
	PredefinedRule {
		name: "total_vms",
		keywords: &["how many vms", "total vms", "number of vms", "count vms", "how many virtual machines"],
		sql: "SELECT COUNT(DISTINCT \"VM\") AS \"total_vms\" FROM info",
		explanation: "This is the total number of distinct VMs in the inventory.",
	},
];

/// Case-insensitive substring match, first declared rule wins. No fuzzy or
/// partial scoring.
pub fn match_predefined(question: &str) -> Option<&'static PredefinedRule> {
	let lowered = question.to_lowercase();

	RULES
		.iter()
		.find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
}
