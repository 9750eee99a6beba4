use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	/// Upper bound on waiting for a pooled connection.
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
	/// Applied as the session `statement_timeout` on every pooled connection.
	#[serde(default = "default_statement_timeout_ms")]
	pub statement_timeout_ms: u64,
}
impl Postgres {
	pub fn new(dsn: impl Into<String>, pool_max_conns: u32) -> Self {
		Self {
			dsn: dsn.into(),
			pool_max_conns,
			acquire_timeout_ms: default_acquire_timeout_ms(),
			statement_timeout_ms: default_statement_timeout_ms(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Run the count and fetch phases of one request inside a single read-only snapshot.
	pub snapshot_reads: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_acquire_timeout_ms() -> u64 {
	5_000
}

fn default_statement_timeout_ms() -> u64 {
	10_000
}
