use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{Connection, PgConnection};

use crate::{
	SearchService, ServiceResult, normalize,
	query::{self, Facets, Page, QueryPlan, SearchMode, SortKey},
};
use sps_domain::term;
use sps_storage::{models::ContentRow, queries};

/// Raw query-string parameters. Everything is optional and validated before use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
	pub q: Option<String>,
	#[serde(rename = "type")]
	pub category_title: Option<String>,
	pub players: Option<String>,
	pub level: Option<String>,
	pub channel: Option<String>,
	pub sort: Option<String>,
	pub limit: Option<String>,
	pub offset: Option<String>,
}
/// Builds a request from raw query pairs. The first value of a repeated key wins and unknown keys
/// are ignored.
impl FromIterator<(String, String)> for SearchRequest {
	fn from_iter<I>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut request = Self::default();

		for (key, value) in pairs {
			let slot = match key.as_str() {
				"q" => &mut request.q,
				"type" => &mut request.category_title,
				"players" => &mut request.players,
				"level" => &mut request.level,
				"channel" => &mut request.channel,
				"sort" => &mut request.sort,
				"limit" => &mut request.limit,
				"offset" => &mut request.offset,
				_ => continue,
			};

			slot.get_or_insert(value);
		}

		request
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
	pub id: String,
	pub title: String,
	pub upload_date: String,
	pub video_url: String,
	pub view_count: Option<i32>,
	pub like_count: Option<i32>,
	pub duration: Option<String>,
	/// Resolved channel display name.
	pub channel_category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub activities: Vec<ActivityItem>,
	pub total: i64,
	pub current_display_count: i64,
}

/// A request after validation and mode selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
	pub mode: SearchMode,
	pub sort: SortKey,
	pub page: Page,
	pub corrected: bool,
}
impl SearchQuery {
	pub fn from_request(req: &SearchRequest) -> Self {
		let term = req.q.as_deref().and_then(term::normalize_term);
		let facets = Facets::parse(
			req.category_title.as_deref(),
			req.players.as_deref(),
			req.level.as_deref(),
			req.channel.as_deref(),
		);
		let sort = SortKey::parse(req.sort.as_deref());
		let page = Page::parse(req.limit.as_deref(), req.offset.as_deref());

		Self {
			mode: SearchMode::select(term, facets.value),
			sort: sort.value,
			page: page.value,
			corrected: facets.corrected || sort.corrected || page.corrected,
		}
	}
}

/// Executes plans for one request. Implementations hold a single connection for the whole request.
pub(crate) trait SearchStore {
	async fn count(&mut self, plan: &QueryPlan) -> ServiceResult<i64>;

	async fn ids(&mut self, plan: &QueryPlan) -> ServiceResult<Vec<String>>;

	async fn rows(&mut self, plan: &QueryPlan) -> ServiceResult<Vec<ContentRow>>;

	async fn channel_names(&mut self, ids: &[i32]) -> ServiceResult<HashMap<i32, String>>;
}

struct ConnectionStore<'c> {
	conn: &'c mut PgConnection,
}
impl SearchStore for ConnectionStore<'_> {
	async fn count(&mut self, plan: &QueryPlan) -> ServiceResult<i64> {
		let total = sqlx::query_scalar_with::<_, i64, _>(&plan.sql, plan.arguments()?)
			.fetch_one(&mut *self.conn)
			.await?;

		Ok(total)
	}

	async fn ids(&mut self, plan: &QueryPlan) -> ServiceResult<Vec<String>> {
		let ids = sqlx::query_scalar_with::<_, String, _>(&plan.sql, plan.arguments()?)
			.fetch_all(&mut *self.conn)
			.await?;

		Ok(ids)
	}

	async fn rows(&mut self, plan: &QueryPlan) -> ServiceResult<Vec<ContentRow>> {
		let rows = sqlx::query_as_with::<_, ContentRow, _>(&plan.sql, plan.arguments()?)
			.fetch_all(&mut *self.conn)
			.await?;

		Ok(rows)
	}

	async fn channel_names(&mut self, ids: &[i32]) -> ServiceResult<HashMap<i32, String>> {
		Ok(queries::channel_names(&mut *self.conn, ids).await?)
	}
}

impl SearchService {
	pub async fn search(&self, req: SearchRequest) -> ServiceResult<SearchResponse> {
		let query = SearchQuery::from_request(&req);

		if query.corrected {
			tracing::debug!(?req, "Search parameters were coerced to safe defaults.");
		}

		let mut conn = self.db.pool.acquire().await?;
		let response = if self.cfg.search.snapshot_reads {
			let mut tx = conn.begin().await?;

			sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
				.execute(&mut *tx)
				.await?;

			let response = execute(&mut ConnectionStore { conn: &mut tx }, &query).await?;

			tx.commit().await?;

			response
		} else {
			execute(&mut ConnectionStore { conn: &mut conn }, &query).await?
		};

		tracing::info!(
			mode = query.mode.name(),
			total = response.total,
			returned = response.activities.len(),
			"Search completed."
		);

		Ok(response)
	}
}

/// Runs the count and fetch phases, then resolves channel names for the fetched page.
pub(crate) async fn execute<S>(store: &mut S, query: &SearchQuery) -> ServiceResult<SearchResponse>
where
	S: SearchStore,
{
	let (total, rows) = match &query.mode {
		SearchMode::Plain { term } => {
			let total = store.count(&query::plain_count(term)).await?;
			let rows = store.rows(&query::plain_fetch(term, query.sort, query.page)).await?;

			(total, rows)
		},
		SearchMode::Faceted { facets, term } => {
			let ids = store.ids(&query::candidate_ids(facets)).await?;

			if ids.is_empty() {
				return Ok(SearchResponse { activities: Vec::new(), total: 0, current_display_count: 0 });
			}

			let term = term.as_deref();
			let total = store.count(&query::candidates_count(&ids, term)).await?;
			let rows =
				store.rows(&query::candidates_fetch(&ids, term, query.sort, query.page)).await?;

			(total, rows)
		},
	};
	let fetched = i64::try_from(rows.len()).unwrap_or(i64::MAX);
	let channel_ids = normalize::channel_refs(&rows);
	let channels =
		if channel_ids.is_empty() { HashMap::new() } else { store.channel_names(&channel_ids).await? };
	let activities: Vec<ActivityItem> =
		rows.into_iter().filter_map(|row| normalize::to_activity(row, &channels)).collect();
	let current_display_count = query.page.offset.saturating_add(fetched).min(total);

	Ok(SearchResponse { activities, total, current_display_count })
}
