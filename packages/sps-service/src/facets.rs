use serde::Serialize;

use crate::{
	SearchService, ServiceResult,
	query::{self, FacetColumn},
};
use sps_domain::level;
use sps_storage::queries;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelItem {
	pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelItem {
	pub id: i32,
	pub channel_name: String,
	pub channel_link: Option<String>,
}

impl SearchService {
	/// Distinct non-empty values of a facet column, ascending. Unknown columns yield nothing.
	pub async fn list_distinct(&self, column: &str) -> ServiceResult<Vec<String>> {
		let Some(column) = FacetColumn::parse(column) else {
			tracing::debug!(column, "Rejected listing for a non-facet column.");

			return Ok(Vec::new());
		};
		let plan = query::distinct_values(column);
		let values = sqlx::query_scalar_with::<_, String, _>(&plan.sql, plan.arguments()?)
			.fetch_all(&self.db.pool)
			.await?;

		tracing::info!(column = column.column(), count = values.len(), "Listed facet values.");

		Ok(values)
	}

	/// Skill levels ordered by rank, then lexically within the fallback bucket.
	pub async fn list_levels(&self) -> ServiceResult<Vec<LevelItem>> {
		let mut levels = queries::distinct_levels(&self.db.pool).await?;

		level::sort_labels(&mut levels);

		Ok(levels.into_iter().map(|level| LevelItem { level }).collect())
	}

	pub async fn list_channels(&self) -> ServiceResult<Vec<ChannelItem>> {
		let rows = queries::list_channels(&self.db.pool).await?;

		Ok(rows
			.into_iter()
			.map(|row| ChannelItem {
				id: row.id,
				channel_name: row.cname.unwrap_or_default(),
				channel_link: row.clink,
			})
			.collect())
	}
}
