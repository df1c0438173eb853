use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::predict::{subpoint, wire_time, Subpoint};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::api::visibility::{resolve_satellite, TleInput};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PositionRequest {
    /// Satellite TLE; the configured default satellite is used when omitted.
    pub satellite: Option<TleInput>,
    /// UTC instant, "YYYY-MM-DD HH:MM:SS"; defaults to now.
    pub time: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/position",
    tag = "position",
    request_body = PositionRequest,
    responses(
        (status = 200, description = "Ground-track subpoint", body = Subpoint),
        (status = 400, description = "Invalid TLE or timestamp", body = crate::web::api::error::ErrorResponse),
        (status = 500, description = "Propagation failure", body = crate::web::api::error::ErrorResponse)
    )
)]
pub async fn compute_position(
    State(state): State<AppState>,
    Json(request): Json<PositionRequest>,
) -> ApiResult<impl IntoResponse> {
    let satellite = resolve_satellite(&state, request.satellite)?;

    let time = match request.time {
        Some(s) => wire_time::parse(&s)
            .map_err(|e| ApiError::Validation(format!("invalid timestamp '{}': {}", s, e)))?,
        None => chrono::Utc::now(),
    };

    let position = subpoint(&satellite, time)?;
    Ok((StatusCode::OK, Json(position)))
}
