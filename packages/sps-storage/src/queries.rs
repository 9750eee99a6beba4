use std::collections::HashMap;

use sqlx::PgExecutor;

use crate::{Result, models::ChannelRow};

/// Resolves channel display names for a batch of surrogate ids in one round trip.
///
/// Ids with no row, or with a `NULL` name, are absent from the returned map.
pub async fn channel_names<'e, E>(executor: E, ids: &[i32]) -> Result<HashMap<i32, String>>
where
	E: PgExecutor<'e>,
{
	if ids.is_empty() {
		return Ok(HashMap::new());
	}

	let rows: Vec<(i32, Option<String>)> =
		sqlx::query_as("SELECT id, cname FROM cid WHERE id = ANY($1)")
			.bind(ids)
			.fetch_all(executor)
			.await?;

	Ok(rows.into_iter().filter_map(|(id, name)| name.map(|name| (id, name))).collect())
}

/// Channels with a display name, by surrogate id.
pub async fn list_channels<'e, E>(executor: E) -> Result<Vec<ChannelRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ChannelRow>(
		"\
SELECT id, cname, clink
FROM cid
WHERE cname IS NOT NULL AND cname <> ''
ORDER BY id",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Distinct non-null skill levels in storage order. Callers apply the display ranking.
pub async fn distinct_levels<'e, E>(executor: E) -> Result<Vec<String>>
where
	E: PgExecutor<'e>,
{
	let levels = sqlx::query_scalar(
		"\
SELECT DISTINCT level
FROM category
WHERE level IS NOT NULL AND level <> ''",
	)
	.fetch_all(executor)
	.await?;

	Ok(levels)
}
