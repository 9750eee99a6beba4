use serde::Serialize;

use crate::{Result, db::Db, schema::TABLES};

#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
	pub table: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rows: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
	pub tables: Vec<TableCount>,
	pub total_rows: i64,
}

/// Row counts for every search table. A table that cannot be counted, for example because it does
/// not exist yet, is reported with its error instead of failing the report.
pub async fn table_counts(db: &Db) -> Result<StatsReport> {
	let mut conn = db.pool.acquire().await?;
	let mut tables = Vec::with_capacity(TABLES.len());
	let mut total_rows = 0;

	for table in TABLES {
		let sql = format!("SELECT count(*) FROM {table}");

		match sqlx::query_scalar::<_, i64>(&sql).fetch_one(&mut *conn).await {
			Ok(rows) => {
				total_rows += rows;

				tables.push(TableCount { table, rows: Some(rows), error: None });
			},
			Err(err) => tables.push(TableCount { table, rows: None, error: Some(err.to_string()) }),
		}
	}

	Ok(StatsReport { tables, total_rows })
}
