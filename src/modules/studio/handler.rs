use super::dto::{GenerateRequest, GenerateResponse, HealthResponse};
use super::page::INDEX_HTML;
use super::service::StudioService;
use crate::common::response::{ApiError, ApiSuccess, ErrorBody};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};

/// Studio page
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Single page front end", content_type = "text/html", body = String)
    ),
    tag = "Studio"
)]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Generate a video from a prompt
///
/// Runs the model synchronously. Only one generation runs at a time; a request
/// arriving while the GPU is in use is answered immediately with
/// `{"error": "GPU is busy"}`. Busy and model errors are both returned with 200.
/// The prompt is forwarded as given.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Video written, or an error message", body = GenerateResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorBody),
        (status = 422, description = "Body has no `prompt` string", body = ErrorBody)
    ),
    tag = "Studio"
)]
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            return ApiError(rejection.body_text(), rejection.status()).into_response();
        }
    };

    match StudioService::generate(state, payload.prompt).await {
        Ok(res) => ApiSuccess(res, StatusCode::OK).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Liveness and GPU occupancy
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    ),
    tag = "Studio"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    ApiSuccess(StudioService::health(&state), StatusCode::OK)
}
