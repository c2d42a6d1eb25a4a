use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dcq_service::{AskRequest, AskResponse, Error as ServiceError, IngestRequest, IngestResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/ask", post(ask))
		.route("/v1/ingest", post(ingest))
		.route("/v1/forecast", get(forecast))
		.route("/v1/forecast/vms", get(forecast_vms))
		.route("/v1/forecast/all", get(forecast_all))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct AskBody {
	question: Option<String>,
}

async fn ask(
	State(state): State<AppState>,
	Json(payload): Json<AskBody>,
) -> Result<Json<AskResponse>, ApiError> {
	let question = payload.question.ok_or_else(|| {
		json_error(StatusCode::BAD_REQUEST, "Missing required field: question.", None)
	})?;
	let response = state.service.ask(AskRequest { question }).await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct IngestBody {
	text: Option<String>,
	source: Option<String>,
}

async fn ingest(
	State(state): State<AppState>,
	Json(payload): Json<IngestBody>,
) -> Result<Json<IngestResponse>, ApiError> {
	let text = payload.text.ok_or_else(|| {
		json_error(StatusCode::BAD_REQUEST, "Missing required field: text.", None)
	})?;
	let response =
		state.service.ingest(IngestRequest { text, source: payload.source }).await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct ForecastParams {
	vm: Option<String>,
}

async fn forecast(
	State(state): State<AppState>,
	Query(params): Query<ForecastParams>,
) -> Result<Json<Value>, ApiError> {
	let vm = params
		.vm
		.ok_or_else(|| json_error(StatusCode::BAD_REQUEST, "Missing VM name.", None))?;
	let response = state.service.forecast_vm(&vm).await?;

	Ok(Json(response))
}

async fn forecast_vms(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
	let response = state.service.vm_names().await?;

	Ok(Json(response))
}

async fn forecast_all(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	let response = state.service.forecast_all().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	details: Option<String>,
}

pub fn json_error(
	status: StatusCode,
	error: impl Into<String>,
	details: Option<String>,
) -> ApiError {
	ApiError { status, error: error.into(), details }
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, message, None),
			ServiceError::NoContext { message } =>
				json_error(StatusCode::BAD_REQUEST, message, None),
			ServiceError::DimensionMismatch { .. } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"Embedding dimensions are inconsistent.",
				Some(err.to_string()),
			),
			ServiceError::Storage { message } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"Vector store is unavailable.",
				Some(message),
			),
			ServiceError::CorruptArtifact { message } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"Vector store artifact is corrupt.",
				Some(message),
			),
			ServiceError::ProviderUnavailable { message } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"Text generation service is unavailable.",
				Some(message),
			),
			ServiceError::ProviderRejected { message } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"Text generation was rejected.",
				Some(message),
			),
			ServiceError::Query { message } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"Failed to generate or execute SQL.",
				Some(message),
			),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.error, details: self.details };

		(self.status, Json(body)).into_response()
	}
}
