use serde::Serialize;
use sqlx::PgConnection;

use crate::{Result, db::Db, models::IndexInfo};

pub const TRIGRAM_EXTENSION: &str = "pg_trgm";

#[derive(Debug, Clone, Copy)]
pub struct IndexSpec {
	pub name: &'static str,
	pub table: &'static str,
	pub definition: &'static str,
	pub requires_trigram: bool,
}

/// Search indexes, in the order the batch creates them.
pub const SEARCH_INDEXES: [IndexSpec; 8] = [
	IndexSpec {
		name: "idx_contents_title_gin",
		table: "contents",
		definition: "CREATE INDEX IF NOT EXISTS idx_contents_title_gin ON contents USING gin (title gin_trgm_ops)",
		requires_trigram: true,
	},
	IndexSpec {
		name: "idx_contents_upload_date",
		table: "contents",
		definition: "CREATE INDEX IF NOT EXISTS idx_contents_upload_date ON contents (upload_date DESC NULLS LAST)",
		requires_trigram: false,
	},
	IndexSpec {
		name: "idx_contents_channel_category",
		table: "contents",
		definition: "CREATE INDEX IF NOT EXISTS idx_contents_channel_category ON contents (channel_category)",
		requires_trigram: false,
	},
	IndexSpec {
		name: "idx_category_category_title",
		table: "category",
		definition: "CREATE INDEX IF NOT EXISTS idx_category_category_title ON category (category_title)",
		requires_trigram: false,
	},
	IndexSpec {
		name: "idx_category_players",
		table: "category",
		definition: "CREATE INDEX IF NOT EXISTS idx_category_players ON category (players)",
		requires_trigram: false,
	},
	IndexSpec {
		name: "idx_category_level",
		table: "category",
		definition: "CREATE INDEX IF NOT EXISTS idx_category_level ON category (level)",
		requires_trigram: false,
	},
	IndexSpec {
		name: "idx_category_channel_brand_category",
		table: "category",
		definition: "CREATE INDEX IF NOT EXISTS idx_category_channel_brand_category ON category (channel_brand_category)",
		requires_trigram: false,
	},
	IndexSpec {
		name: "idx_category_filters_composite",
		table: "category",
		definition: "CREATE INDEX IF NOT EXISTS idx_category_filters_composite ON category (category_title, players, level, channel_brand_category)",
		requires_trigram: false,
	},
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
	AlreadyExists,
	TrigramUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndexOutcome {
	Created,
	Skipped { reason: SkipReason },
	Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexResult {
	pub name: &'static str,
	pub table: &'static str,
	#[serde(flatten)]
	pub outcome: IndexOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
	pub trigram_available: bool,
	pub existing_before: usize,
	pub existing_after: usize,
	pub results: Vec<IndexResult>,
}
impl IndexReport {
	pub fn created(&self) -> usize {
		self.count(|outcome| matches!(outcome, IndexOutcome::Created))
	}

	pub fn skipped(&self) -> usize {
		self.count(|outcome| matches!(outcome, IndexOutcome::Skipped { .. }))
	}

	pub fn failed(&self) -> usize {
		self.count(|outcome| matches!(outcome, IndexOutcome::Failed { .. }))
	}

	fn count(&self, pred: impl Fn(&IndexOutcome) -> bool) -> usize {
		self.results.iter().filter(|result| pred(&result.outcome)).count()
	}
}

/// Makes sure the trigram extension is loaded.
///
/// Returns `Ok(false)` when the extension is missing and cannot be created, for example when the
/// role lacks the privilege. Only connection-level failures are errors.
pub async fn ensure_trigram(conn: &mut PgConnection) -> Result<bool> {
	if trigram_installed(&mut *conn).await? {
		return Ok(true);
	}

	match sqlx::query("CREATE EXTENSION IF NOT EXISTS pg_trgm").execute(&mut *conn).await {
		Ok(_) => {
			tracing::info!(extension = TRIGRAM_EXTENSION, "Extension created.");

			Ok(true)
		},
		Err(err) => {
			tracing::warn!(extension = TRIGRAM_EXTENSION, %err, "Extension unavailable.");

			Ok(false)
		},
	}
}

/// Creates every missing search index.
///
/// Each statement runs in autocommit mode on one connection, so one failure is recorded and the
/// batch moves on.
pub async fn create_indexes(db: &Db) -> Result<IndexReport> {
	let mut conn = db.pool.acquire().await?;
	let existing_before = count_search_indexes(&mut conn).await?;
	let trigram_available = ensure_trigram(&mut conn).await?;
	let mut results = Vec::with_capacity(SEARCH_INDEXES.len());

	for spec in SEARCH_INDEXES {
		let outcome = create_index(&mut conn, &spec, trigram_available).await;

		match &outcome {
			IndexOutcome::Created => tracing::info!(index = spec.name, "Index created."),
			IndexOutcome::Skipped { reason } =>
				tracing::info!(index = spec.name, ?reason, "Index skipped."),
			IndexOutcome::Failed { message } =>
				tracing::warn!(index = spec.name, %message, "Index creation failed."),
		}

		results.push(IndexResult { name: spec.name, table: spec.table, outcome });
	}

	let existing_after = count_search_indexes(&mut conn).await?;

	Ok(IndexReport { trigram_available, existing_before, existing_after, results })
}

/// Indexes on the search tables in the current schema.
pub async fn list_indexes(db: &Db) -> Result<Vec<IndexInfo>> {
	let rows = sqlx::query_as::<_, IndexInfo>(
		"\
SELECT tablename, indexname, indexdef
FROM pg_indexes
WHERE schemaname = current_schema()
	AND tablename IN ('contents', 'category', 'cid')
ORDER BY tablename, indexname",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

async fn create_index(
	conn: &mut PgConnection,
	spec: &IndexSpec,
	trigram_available: bool,
) -> IndexOutcome {
	if spec.requires_trigram && !trigram_available {
		return IndexOutcome::Skipped { reason: SkipReason::TrigramUnavailable };
	}

	match index_exists(&mut *conn, spec.name).await {
		Ok(true) => return IndexOutcome::Skipped { reason: SkipReason::AlreadyExists },
		Ok(false) => {},
		Err(err) => return IndexOutcome::Failed { message: err.to_string() },
	}

	match sqlx::query(spec.definition).execute(&mut *conn).await {
		Ok(_) => IndexOutcome::Created,
		Err(err) => IndexOutcome::Failed { message: err.to_string() },
	}
}

async fn trigram_installed(conn: &mut PgConnection) -> Result<bool> {
	let installed =
		sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_extension WHERE extname = $1)")
			.bind(TRIGRAM_EXTENSION)
			.fetch_one(conn)
			.await?;

	Ok(installed)
}

async fn index_exists(conn: &mut PgConnection, name: &str) -> Result<bool> {
	let exists = sqlx::query_scalar(
		"\
SELECT EXISTS(
	SELECT 1
	FROM pg_indexes
	WHERE schemaname = current_schema() AND indexname = $1
)",
	)
	.bind(name)
	.fetch_one(conn)
	.await?;

	Ok(exists)
}

async fn count_search_indexes(conn: &mut PgConnection) -> Result<usize> {
	let names: Vec<&str> = SEARCH_INDEXES.iter().map(|spec| spec.name).collect();
	let count: i64 = sqlx::query_scalar(
		"\
SELECT count(*)
FROM pg_indexes
WHERE schemaname = current_schema() AND indexname = ANY($1)",
	)
	.bind(names)
	.fetch_one(conn)
	.await?;

	Ok(usize::try_from(count).unwrap_or_default())
}
