//! SQL construction for search and listing.
//!
//! Every plan is a parameterized statement. The only text ever spliced into SQL comes from the
//! fixed column enumerations below; user input is always bound.

use std::num::IntErrorKind;

use sqlx::{Arguments, postgres::PgArguments};

use sps_domain::term;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_OFFSET: i64 = 0;

const CONTENT_COLUMNS: &str =
	"id, title, upload_date, video_url, view_count, like_count, duration, channel_category";
const TITLE_MATCH: &str = "title ILIKE ";
const LIKE_ESCAPE_CLAUSE: &str = " ESCAPE '\\'";

/// A value after whitelisting, with a flag telling whether the caller's input was coerced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validated<T> {
	pub value: T,
	pub corrected: bool,
}
impl<T> Validated<T> {
	pub fn accepted(value: T) -> Self {
		Self { value, corrected: false }
	}

	pub fn corrected(value: T) -> Self {
		Self { value, corrected: true }
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
	#[default]
	UploadDate,
	ViewCount,
	LikeCount,
}
impl SortKey {
	pub fn column(self) -> &'static str {
		match self {
			Self::UploadDate => "upload_date",
			Self::ViewCount => "view_count",
			Self::LikeCount => "like_count",
		}
	}

	/// Missing input is the default; anything outside the whitelist is corrected to it.
	pub fn parse(raw: Option<&str>) -> Validated<Self> {
		match raw {
			None | Some("") => Validated::accepted(Self::default()),
			Some("upload_date") => Validated::accepted(Self::UploadDate),
			Some("view_count") => Validated::accepted(Self::ViewCount),
			Some("like_count") => Validated::accepted(Self::LikeCount),
			Some(_) => Validated::corrected(Self::default()),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
	pub limit: i64,
	pub offset: i64,
}
impl Page {
	pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Validated<Self> {
		let limit = clamp_number(limit, DEFAULT_LIMIT, 1, MAX_LIMIT);
		let offset = clamp_number(offset, DEFAULT_OFFSET, 0, i64::MAX);

		Validated {
			value: Self { limit: limit.value, offset: offset.value },
			corrected: limit.corrected || offset.corrected,
		}
	}
}
impl Default for Page {
	fn default() -> Self {
		Self { limit: DEFAULT_LIMIT, offset: DEFAULT_OFFSET }
	}
}

/// Facet filters. Absent facets do not constrain; present ones are ANDed and matched exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
	pub category_title: Option<String>,
	pub players: Option<String>,
	pub level: Option<String>,
	pub channel: Option<i32>,
}
impl Facets {
	/// Empty strings count as absent. A channel that is not an integer is dropped.
	pub fn parse(
		category_title: Option<&str>,
		players: Option<&str>,
		level: Option<&str>,
		channel: Option<&str>,
	) -> Validated<Self> {
		let present = |raw: Option<&str>| raw.filter(|value| !value.is_empty()).map(str::to_string);
		let mut corrected = false;
		let channel = match channel.map(str::trim).filter(|value| !value.is_empty()) {
			None => None,
			Some(raw) => match raw.parse::<i32>() {
				Ok(id) => Some(id),
				Err(_) => {
					corrected = true;

					None
				},
			},
		};

		Validated {
			value: Self {
				category_title: present(category_title),
				players: present(players),
				level: present(level),
				channel,
			},
			corrected,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.category_title.is_none()
			&& self.players.is_none()
			&& self.level.is_none()
			&& self.channel.is_none()
	}

	fn bindings(&self) -> Vec<(Facet, Param)> {
		let mut out = Vec::new();

		if let Some(value) = &self.category_title {
			out.push((Facet::CategoryTitle, Param::Text(value.clone())));
		}
		if let Some(value) = &self.players {
			out.push((Facet::Players, Param::Text(value.clone())));
		}
		if let Some(value) = &self.level {
			out.push((Facet::Level, Param::Text(value.clone())));
		}
		if let Some(value) = self.channel {
			out.push((Facet::Channel, Param::Int4(value)));
		}

		out
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facet {
	CategoryTitle,
	Players,
	Level,
	Channel,
}
impl Facet {
	pub fn column(self) -> &'static str {
		match self {
			Self::CategoryTitle => "cat.category_title",
			Self::Players => "cat.players",
			Self::Level => "cat.level",
			Self::Channel => "cat.channel_brand_category",
		}
	}
}

/// Facet columns whose distinct values are offered to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacetColumn {
	CategoryTitle,
	Players,
}
impl FacetColumn {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"category_title" => Some(Self::CategoryTitle),
			"players" => Some(Self::Players),
			_ => None,
		}
	}

	pub fn column(self) -> &'static str {
		match self {
			Self::CategoryTitle => "category_title",
			Self::Players => "players",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchMode {
	/// Title match over `contents` alone.
	Plain { term: String },
	/// Facet join first, then an optional title match over the candidates.
	Faceted { facets: Facets, term: Option<String> },
}
impl SearchMode {
	pub fn select(term: Option<String>, facets: Facets) -> Self {
		match term {
			Some(term) if facets.is_empty() => Self::Plain { term },
			term => Self::Faceted { facets, term },
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Plain { .. } => "plain",
			Self::Faceted { .. } => "faceted",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Param {
	Text(String),
	Int4(i32),
	Int8(i64),
	Ids(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPlan {
	pub sql: String,
	pub params: Vec<Param>,
}
impl QueryPlan {
	pub fn arguments(&self) -> Result<PgArguments, sqlx::Error> {
		let mut args = PgArguments::default();

		for param in &self.params {
			let added = match param {
				Param::Text(value) => args.add(value.clone()),
				Param::Int4(value) => args.add(*value),
				Param::Int8(value) => args.add(*value),
				Param::Ids(values) => args.add(values.clone()),
			};

			added.map_err(sqlx::Error::Encode)?;
		}

		Ok(args)
	}
}

struct PlanWriter {
	sql: String,
	params: Vec<Param>,
}
impl PlanWriter {
	fn new(sql: &str) -> Self {
		Self { sql: sql.to_string(), params: Vec::new() }
	}

	fn push(&mut self, sql: &str) -> &mut Self {
		self.sql.push_str(sql);

		self
	}

	fn push_bind(&mut self, param: Param) -> &mut Self {
		self.params.push(param);
		self.sql.push('$');
		self.sql.push_str(&self.params.len().to_string());

		self
	}

	fn push_title_match(&mut self, term: &str) -> &mut Self {
		self.push(TITLE_MATCH)
			.push_bind(Param::Text(term::substring_pattern(term)))
			.push(LIKE_ESCAPE_CLAUSE)
	}

	fn push_order_page(&mut self, sort: SortKey, page: Page) -> &mut Self {
		self.push(" ORDER BY ")
			.push(sort.column())
			.push(" DESC NULLS LAST, id LIMIT ")
			.push_bind(Param::Int8(page.limit))
			.push(" OFFSET ")
			.push_bind(Param::Int8(page.offset))
	}

	fn finish(self) -> QueryPlan {
		QueryPlan { sql: self.sql, params: self.params }
	}
}

pub fn plain_count(term: &str) -> QueryPlan {
	let mut writer = PlanWriter::new("SELECT count(*) FROM contents WHERE ");

	writer.push_title_match(term);

	writer.finish()
}

pub fn plain_fetch(term: &str, sort: SortKey, page: Page) -> QueryPlan {
	let mut writer = PlanWriter::new(&format!("SELECT {CONTENT_COLUMNS} FROM contents WHERE "));

	writer.push_title_match(term).push_order_page(sort, page);

	writer.finish()
}

/// Distinct ids of classified content matching every present facet.
pub fn candidate_ids(facets: &Facets) -> QueryPlan {
	let mut writer = PlanWriter::new(
		"SELECT DISTINCT c.id FROM contents c \
		 JOIN category cat ON c.id = cat.id \
		 JOIN cid ch ON cat.channel_brand_category = ch.id \
		 WHERE 1=1",
	);

	for (facet, param) in facets.bindings() {
		writer.push(" AND ").push(facet.column()).push(" = ").push_bind(param);
	}

	writer.finish()
}

pub fn candidates_count(ids: &[String], term: Option<&str>) -> QueryPlan {
	let mut writer = PlanWriter::new("SELECT count(*) FROM contents WHERE id = ANY(");

	writer.push_bind(Param::Ids(ids.to_vec())).push(")");

	if let Some(term) = term {
		writer.push(" AND ").push_title_match(term);
	}

	writer.finish()
}

pub fn candidates_fetch(ids: &[String], term: Option<&str>, sort: SortKey, page: Page) -> QueryPlan {
	let mut writer =
		PlanWriter::new(&format!("SELECT {CONTENT_COLUMNS} FROM contents WHERE id = ANY("));

	writer.push_bind(Param::Ids(ids.to_vec())).push(")");

	if let Some(term) = term {
		writer.push(" AND ").push_title_match(term);
	}

	writer.push_order_page(sort, page);

	writer.finish()
}

pub fn distinct_values(column: FacetColumn) -> QueryPlan {
	let column = column.column();

	QueryPlan {
		sql: format!(
			"SELECT DISTINCT {column} FROM category \
			 WHERE {column} IS NOT NULL AND {column} <> '' \
			 ORDER BY {column} ASC"
		),
		params: Vec::new(),
	}
}

fn clamp_number(raw: Option<&str>, default: i64, min: i64, max: i64) -> Validated<i64> {
	let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
		return Validated::accepted(default);
	};
	let value = match raw.parse::<i64>() {
		Ok(value) => value,
		// Out-of-range integers still clamp; only non-numeric input falls back.
		Err(err) => match err.kind() {
			IntErrorKind::PosOverflow => return Validated::corrected(max),
			IntErrorKind::NegOverflow => return Validated::corrected(min),
			_ => return Validated::corrected(default),
		},
	};
	let clamped = value.clamp(min, max);

	Validated { value: clamped, corrected: clamped != value }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn facets(category: &str, channel: Option<i32>) -> Facets {
		Facets { category_title: Some(category.to_string()), channel, ..Facets::default() }
	}

	#[test]
	fn limit_and_offset_clamp() {
		let page = Page::parse(Some("500"), Some("-5"));

		assert_eq!(page.value, Page { limit: 100, offset: 0 });
		assert!(page.corrected);

		let page = Page::parse(Some("0"), None);

		assert_eq!(page.value.limit, 1);
		assert!(page.corrected);
	}

	#[test]
	fn non_numeric_page_input_falls_back_to_defaults() {
		let page = Page::parse(Some("ten"), Some("1.5"));

		assert_eq!(page.value, Page::default());
		assert!(page.corrected);
	}

	#[test]
	fn oversized_integers_clamp_instead_of_resetting() {
		let page = Page::parse(Some("99999999999999999999"), Some("-99999999999999999999"));

		assert_eq!(page.value, Page { limit: MAX_LIMIT, offset: 0 });
		assert!(page.corrected);

		let page = Page::parse(Some("-99999999999999999999"), Some("99999999999999999999"));

		assert_eq!(page.value, Page { limit: 1, offset: i64::MAX });
	}

	#[test]
	fn missing_page_input_is_accepted() {
		let page = Page::parse(None, Some(""));

		assert_eq!(page, Validated::accepted(Page::default()));
		assert_eq!(Page::parse(Some("25"), Some("40")).value, Page { limit: 25, offset: 40 });
	}

	#[test]
	fn sort_outside_whitelist_falls_back() {
		assert_eq!(
			SortKey::parse(Some("title; DROP TABLE contents")),
			Validated::corrected(SortKey::UploadDate)
		);
		assert_eq!(SortKey::parse(Some("like_count")), Validated::accepted(SortKey::LikeCount));
		assert_eq!(SortKey::parse(None), Validated::accepted(SortKey::UploadDate));
	}

	#[test]
	fn non_numeric_channel_is_dropped() {
		let parsed = Facets::parse(Some(""), None, Some("中学生"), Some("abc"));

		assert!(parsed.corrected);
		assert_eq!(parsed.value.channel, None);
		assert_eq!(parsed.value.category_title, None);
		assert_eq!(parsed.value.level.as_deref(), Some("中学生"));
		assert_eq!(Facets::parse(None, None, None, Some(" 7 ")).value.channel, Some(7));
	}

	#[test]
	fn mode_follows_term_and_facets() {
		let plain = SearchMode::select(Some("drill".to_string()), Facets::default());

		assert_eq!(plain, SearchMode::Plain { term: "drill".to_string() });

		let faceted = SearchMode::select(Some("drill".to_string()), facets("ドリブル", None));

		assert_eq!(faceted.name(), "faceted");
		assert_eq!(SearchMode::select(None, Facets::default()).name(), "faceted");
	}

	#[test]
	fn plain_plans_bind_escaped_pattern() {
		let count = plain_count("100%_\\");

		assert_eq!(count.sql, "SELECT count(*) FROM contents WHERE title ILIKE $1 ESCAPE '\\'");
		assert_eq!(count.params, vec![Param::Text("%100\\%\\_\\\\%".to_string())]);

		let fetch = plain_fetch("drill", SortKey::ViewCount, Page { limit: 20, offset: 40 });

		assert!(fetch.sql.ends_with(
			"WHERE title ILIKE $1 ESCAPE '\\' ORDER BY view_count DESC NULLS LAST, id LIMIT $2 OFFSET $3"
		));
		assert_eq!(fetch.params[1..], [Param::Int8(20), Param::Int8(40)]);
	}

	#[test]
	fn candidate_plan_numbers_facets_in_order() {
		let plan = candidate_ids(&Facets {
			category_title: Some("ドリブル".to_string()),
			players: Some("2人".to_string()),
			level: None,
			channel: Some(3),
		});

		assert!(plan.sql.starts_with("SELECT DISTINCT c.id FROM contents c JOIN category cat"));
		assert!(plan.sql.ends_with(
			"WHERE 1=1 AND cat.category_title = $1 AND cat.players = $2 AND cat.channel_brand_category = $3"
		));
		assert_eq!(plan.params.len(), 3);
		assert_eq!(plan.params[2], Param::Int4(3));
	}

	#[test]
	fn both_modes_share_the_title_predicate() {
		let ids = vec!["a".to_string(), "b".to_string()];
		let plain = plain_count("ドリブル");
		let faceted = candidates_count(&ids, Some("ドリブル"));

		assert!(faceted.sql.ends_with("AND title ILIKE $2 ESCAPE '\\'"));
		assert_eq!(plain.params[0], faceted.params[1]);
		assert_eq!(faceted.params[0], Param::Ids(ids));
	}

	#[test]
	fn candidate_fetch_without_term_skips_title_match() {
		let plan = candidates_fetch(&["a".to_string()], None, SortKey::default(), Page::default());

		assert!(!plan.sql.contains("ILIKE"));
		assert!(plan.sql.contains("ORDER BY upload_date DESC NULLS LAST, id LIMIT $2 OFFSET $3"));
		assert_eq!(plan.params.len(), 3);
	}

	#[test]
	fn distinct_values_only_uses_whitelisted_columns() {
		assert_eq!(FacetColumn::parse("level"), None);
		assert_eq!(FacetColumn::parse("players; --"), None);

		let plan = distinct_values(FacetColumn::Players);

		assert!(plan.sql.starts_with("SELECT DISTINCT players FROM category"));
		assert!(plan.params.is_empty());
	}

	#[test]
	fn plan_arguments_encode_every_param() {
		let plan = candidates_fetch(&["a".to_string()], Some("x"), SortKey::LikeCount, Page::default());

		assert!(plan.arguments().is_ok());
	}
}
