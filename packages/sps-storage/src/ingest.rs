use sqlx::PgExecutor;

use crate::{
	Result,
	db::Db,
	models::{NewCategory, NewChannel, NewContent, RawCount},
};
use sps_domain::{counts, feedback::Feedback};

/// Registers a channel, returning its surrogate id. Re-registering a known external id returns the
/// existing row.
pub async fn insert_channel<'e, E>(executor: E, channel: &NewChannel) -> Result<i32>
where
	E: PgExecutor<'e>,
{
	let id: i32 = sqlx::query_scalar(
		"\
WITH inserted AS (
	INSERT INTO cid (cid, cname, clink)
	VALUES ($1, $2, $3)
	ON CONFLICT (cid) DO NOTHING
	RETURNING id
)
SELECT id FROM inserted
UNION ALL
SELECT id FROM cid WHERE cid = $1
LIMIT 1",
	)
	.bind(channel.cid.as_str())
	.bind(channel.cname.as_str())
	.bind(channel.clink.as_deref())
	.fetch_one(executor)
	.await?;

	Ok(id)
}

/// Inserts content rows owned by `channel`. Existing ids are left untouched.
pub async fn insert_contents(db: &Db, items: &[NewContent], channel: i32) -> Result<u64> {
	let mut tx = db.pool.begin().await?;
	let mut inserted = 0;

	for item in items {
		let view_count = normalize_count(&item.id, "view_count", item.view_count.as_ref());
		let like_count = normalize_count(&item.id, "like_count", item.like_count.as_ref());
		let result = sqlx::query(
			"\
INSERT INTO contents (
	id,
	title,
	upload_date,
	video_url,
	view_count,
	like_count,
	duration,
	channel_category
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT (id) DO NOTHING",
		)
		.bind(item.id.as_str())
		.bind(item.title.as_deref())
		.bind(item.upload_date.as_deref())
		.bind(item.video_url.as_deref())
		.bind(view_count)
		.bind(like_count)
		.bind(item.duration.as_deref())
		.bind(channel)
		.execute(&mut *tx)
		.await?;

		inserted += result.rows_affected();
	}

	tx.commit().await?;

	tracing::info!(channel, received = items.len(), inserted, "Contents ingested.");

	Ok(inserted)
}

/// Inserts facet rows for already-ingested content. Existing ids are left untouched.
pub async fn insert_categories(db: &Db, items: &[NewCategory], channel: i32) -> Result<u64> {
	let mut tx = db.pool.begin().await?;
	let mut inserted = 0;

	for item in items {
		let result = sqlx::query(
			"\
INSERT INTO category (id, category_title, players, level, channel_brand_category)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (id) DO NOTHING",
		)
		.bind(item.id.as_str())
		.bind(item.category_title.as_deref())
		.bind(item.players.as_deref())
		.bind(item.level.as_deref())
		.bind(channel)
		.execute(&mut *tx)
		.await?;

		inserted += result.rows_affected();
	}

	tx.commit().await?;

	tracing::info!(channel, received = items.len(), inserted, "Categories ingested.");

	Ok(inserted)
}

pub async fn insert_feedback<'e, E>(executor: E, feedback: &Feedback) -> Result<i32>
where
	E: PgExecutor<'e>,
{
	let id: i32 = sqlx::query_scalar(
		"\
INSERT INTO feedback (name, email, category, message)
VALUES ($1, $2, $3, $4)
RETURNING id",
	)
	.bind(feedback.name.as_str())
	.bind(feedback.email.as_str())
	.bind(feedback.category.as_str())
	.bind(feedback.message.as_str())
	.fetch_one(executor)
	.await?;

	Ok(id)
}

fn normalize_count(id: &str, field: &'static str, raw: Option<&RawCount>) -> Option<i32> {
	let text = raw.map(RawCount::to_text);

	match counts::parse_count(text.as_deref()) {
		Ok(value) => value,
		Err(err) => {
			tracing::warn!(%id, field, %err, "Discarding unparseable count.");

			None
		},
	}
}

#[cfg(test)]
mod tests {
	use super::normalize_count;
	use crate::models::RawCount;

	#[test]
	fn placeholder_and_garbage_counts_become_null() {
		assert_eq!(normalize_count("a", "like_count", None), None);
		assert_eq!(normalize_count("a", "like_count", Some(&RawCount::Text("N/A".into()))), None);
		assert_eq!(normalize_count("a", "like_count", Some(&RawCount::Text("many".into()))), None);
		assert_eq!(normalize_count("a", "like_count", Some(&RawCount::Number(-3))), None);
	}

	#[test]
	fn numeric_counts_pass_through() {
		assert_eq!(normalize_count("a", "view_count", Some(&RawCount::Number(120))), Some(120));
		assert_eq!(normalize_count("a", "view_count", Some(&RawCount::Text(" 42 ".into()))), Some(42));
	}
}
