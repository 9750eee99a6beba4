use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use sps_service::{
	AdminReport, ChannelItem, FeedbackRequest, FeedbackResponse, LevelItem, SearchRequest,
	SearchResponse, ServiceError,
};
use sps_storage::{indexes::IndexReport, stats::StatsReport};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/search", get(search))
		.route("/get_unique_values/{column}", get(unique_values))
		.route("/get_levels", get(levels))
		.route("/get_channels", get(channels))
		.route("/submit-feedback", post(submit_feedback))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/init-database", post(init_database))
		.route("/clear-database", post(clear_database))
		.route("/create-indexes", post(create_indexes))
		.route("/db-stats", get(db_stats))
		.with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthBody {
	status: &'static str,
}

async fn health() -> Json<HealthBody> {
	Json(HealthBody { status: "healthy" })
}

async fn search(
	State(state): State<AppState>,
	query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	// Malformed query strings fall back to defaults like any other invalid parameter.
	let pairs = query.map(|Query(pairs)| pairs).unwrap_or_else(|err| {
		tracing::debug!(%err, "Ignoring malformed search query string.");

		Vec::new()
	});
	let request: SearchRequest = pairs.into_iter().collect();
	let response = state.service.search(request).await?;

	Ok(Json(response))
}

async fn unique_values(
	State(state): State<AppState>,
	Path(column): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
	let values = state.service.list_distinct(&column).await?;

	Ok(Json(values))
}

async fn levels(State(state): State<AppState>) -> Result<Json<Vec<LevelItem>>, ApiError> {
	let levels = state.service.list_levels().await?;

	Ok(Json(levels))
}

async fn channels(State(state): State<AppState>) -> Result<Json<Vec<ChannelItem>>, ApiError> {
	let channels = state.service.list_channels().await?;

	Ok(Json(channels))
}

async fn submit_feedback(
	State(state): State<AppState>,
	payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
	let Json(payload) = payload.map_err(|err| {
		tracing::debug!(%err, "Rejected feedback payload.");

		ApiError::new(StatusCode::BAD_REQUEST, "Invalid request.")
	})?;
	let response = state.service.submit_feedback(payload).await?;

	Ok(Json(response))
}

async fn init_database(State(state): State<AppState>) -> Result<Json<AdminReport>, ApiError> {
	let report = state.service.init_schema().await?;

	Ok(Json(report))
}

async fn clear_database(State(state): State<AppState>) -> Result<Json<AdminReport>, ApiError> {
	let report = state.service.reset().await?;

	Ok(Json(report))
}

async fn create_indexes(State(state): State<AppState>) -> Result<Json<IndexReport>, ApiError> {
	let report = state.service.create_indexes().await?;

	Ok(Json(report))
}

async fn db_stats(State(state): State<AppState>) -> Result<Json<StatsReport>, ApiError> {
	let report = state.service.stats().await?;

	Ok(Json(report))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => Self::new(StatusCode::BAD_REQUEST, message),
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage failure.");

				Self::new(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable.")
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.message })).into_response()
	}
}
