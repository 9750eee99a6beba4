use std::collections::HashMap;

use sps_domain::{UNKNOWN_CHANNEL, media, upload_date};
use sps_storage::models::ContentRow;

use crate::search::ActivityItem;

/// Distinct, non-zero channel references on a page, for the batched name lookup.
pub fn channel_refs(rows: &[ContentRow]) -> Vec<i32> {
	let mut ids: Vec<i32> =
		rows.iter().filter_map(|row| row.channel_category).filter(|id| *id != 0).collect();

	ids.sort_unstable();
	ids.dedup();

	ids
}

/// Converts a stored row into its client shape.
///
/// Returns `None` when the upload date cannot be read in either accepted format.
pub fn to_activity(row: ContentRow, channels: &HashMap<i32, String>) -> Option<ActivityItem> {
	let Some(upload_date) = row.upload_date.as_deref().and_then(upload_date::display_upload_date)
	else {
		tracing::warn!(
			id = %row.id,
			upload_date = row.upload_date.as_deref().unwrap_or_default(),
			"Dropping row with unreadable upload date."
		);

		return None;
	};
	let video_url = row.video_url.as_deref().map(media::to_embed_url).unwrap_or_default().into_owned();
	let channel_category = row
		.channel_category
		.filter(|id| *id != 0)
		.and_then(|id| channels.get(&id))
		.cloned()
		.unwrap_or_else(|| UNKNOWN_CHANNEL.to_string());

	Some(ActivityItem {
		id: row.id,
		title: row.title.unwrap_or_default(),
		upload_date,
		video_url,
		view_count: row.view_count,
		like_count: row.like_count,
		duration: row.duration,
		channel_category,
	})
}
