/// Tables owned by the search schema, in creation order.
pub const TABLES: [&str; 4] = ["cid", "contents", "category", "feedback"];

pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

/// Drop order is the reverse of creation order so foreign keys never dangle mid-batch.
pub fn render_drop() -> String {
	TABLES.iter().rev().map(|table| format!("DROP TABLE IF EXISTS {table} CASCADE;\n")).collect()
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_cid.sql" => out.push_str(include_str!("../../../sql/tables/001_cid.sql")),
				"tables/002_contents.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_contents.sql")),
				"tables/003_category.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_category.sql")),
				"tables/004_feedback.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_feedback.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

/// Splits a rendered script into individual statements.
pub(crate) fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}

#[cfg(test)]
mod tests {
	use super::{TABLES, render_drop, render_schema, statements};

	#[test]
	fn schema_expands_every_table() {
		let sql = render_schema();

		assert!(!sql.contains("\\ir"));

		for table in TABLES {
			assert!(
				sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
				"missing table {table}"
			);
		}

		assert_eq!(statements(&sql).count(), TABLES.len());
	}

	#[test]
	fn facets_cascade_from_content_and_channel() {
		let sql = render_schema();

		assert!(sql.contains("REFERENCES contents(id) ON DELETE CASCADE"));
		assert!(sql.contains("REFERENCES cid(id) ON DELETE CASCADE"));
	}

	#[test]
	fn drop_runs_in_reverse_order() {
		let drop = render_drop();
		let order: Vec<_> = statements(&drop).collect();

		assert_eq!(order.first().copied(), Some("DROP TABLE IF EXISTS feedback CASCADE"));
		assert_eq!(order.last().copied(), Some("DROP TABLE IF EXISTS cid CASCADE"));
	}
}
