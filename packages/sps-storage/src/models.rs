use serde::{Deserialize, Serialize};

/// One `contents` row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentRow {
	pub id: String,
	pub title: Option<String>,
	pub upload_date: Option<String>,
	pub video_url: Option<String>,
	pub view_count: Option<i32>,
	pub like_count: Option<i32>,
	pub duration: Option<String>,
	pub channel_category: Option<i32>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChannelRow {
	pub id: i32,
	pub cname: Option<String>,
	pub clink: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct IndexInfo {
	pub tablename: String,
	pub indexname: String,
	pub indexdef: String,
}

/// A count as the producer emits it: either a number or a placeholder string such as `N/A`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
	Number(i64),
	Text(String),
}
impl RawCount {
	pub fn to_text(&self) -> String {
		match self {
			Self::Number(value) => value.to_string(),
			Self::Text(value) => value.clone(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewChannel {
	pub cid: String,
	pub cname: String,
	#[serde(default)]
	pub clink: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContent {
	pub id: String,
	pub title: Option<String>,
	pub upload_date: Option<String>,
	pub video_url: Option<String>,
	#[serde(default)]
	pub view_count: Option<RawCount>,
	#[serde(default)]
	pub like_count: Option<RawCount>,
	pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
	pub id: String,
	#[serde(alias = "category")]
	pub category_title: Option<String>,
	#[serde(alias = "nop")]
	pub players: Option<String>,
	pub level: Option<String>,
}
