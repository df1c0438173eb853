use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::formatter::{self, PassRow, TimelineItem, WindowRow};
use crate::predict::{
    find_common_windows, find_passes, CommonWindow, GroundStation, Pass, Satellite,
};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::config::StationConfig;
use crate::web::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TleInput {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StationInput {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisibilityRequest {
    /// Satellite TLE; the configured default satellite is used when omitted.
    pub satellite: Option<TleInput>,
    /// Overrides for the configured stations.
    pub station1: Option<StationInput>,
    pub station2: Option<StationInput>,
    /// UTC calendar day, YYYY-MM-DD; the window is 00:00:00 to 23:59:59.
    pub date: String,
    pub min_elevation_deg: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationPasses {
    pub station: String,
    pub passes: Vec<Pass>,
    pub table: Vec<PassRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisibilityResponse {
    pub satellite: String,
    pub norad_id: u32,
    pub date: String,
    pub min_elevation_deg: f64,
    pub station1: StationPasses,
    pub station2: StationPasses,
    pub common_windows: Vec<CommonWindow>,
    pub common_table: Vec<WindowRow>,
    pub timeline: Vec<TimelineItem>,
}

#[utoipa::path(
    post,
    path = "/api/visibility",
    tag = "visibility",
    request_body = VisibilityRequest,
    responses(
        (status = 200, description = "Passes and common visibility windows", body = VisibilityResponse),
        (status = 400, description = "Invalid TLE, station or date", body = crate::web::api::error::ErrorResponse),
        (status = 500, description = "Propagation failure", body = crate::web::api::error::ErrorResponse)
    )
)]
pub async fn compute_visibility(
    State(state): State<AppState>,
    Json(request): Json<VisibilityRequest>,
) -> ApiResult<impl IntoResponse> {
    let satellite = resolve_satellite(&state, request.satellite)?;
    let station1 = resolve_station(request.station1, &state.config.station1)?;
    let station2 = resolve_station(request.station2, &state.config.station2)?;
    let (start, end) = day_window(&request.date)?;

    let min_elevation_deg = request
        .min_elevation_deg
        .unwrap_or(state.config.defaults.min_elevation_deg);
    if !(0.0..90.0).contains(&min_elevation_deg) {
        return Err(ApiError::Validation(format!(
            "minimum elevation out of range: {}",
            min_elevation_deg
        )));
    }

    let passes1 = find_passes(&satellite, &station1, start, end, min_elevation_deg)?;
    let passes2 = find_passes(&satellite, &station2, start, end, min_elevation_deg)?;
    let common_windows = find_common_windows(&passes1, &passes2);

    log::debug!(
        "{}: {} passes over {}, {} over {}, {} common windows",
        satellite.name,
        passes1.len(),
        station1.name,
        passes2.len(),
        station2.name,
        common_windows.len()
    );

    let timeline = formatter::timeline_items(
        &station1.name,
        &passes1,
        &station2.name,
        &passes2,
        &common_windows,
    );

    Ok((
        StatusCode::OK,
        Json(VisibilityResponse {
            satellite: satellite.name.clone(),
            norad_id: satellite.norad_id,
            date: request.date,
            min_elevation_deg,
            station1: StationPasses {
                station: station1.name.clone(),
                table: formatter::pass_rows(&passes1),
                passes: passes1,
            },
            station2: StationPasses {
                station: station2.name.clone(),
                table: formatter::pass_rows(&passes2),
                passes: passes2,
            },
            common_table: formatter::window_rows(&common_windows),
            common_windows,
            timeline,
        }),
    ))
}

pub fn resolve_satellite(state: &AppState, input: Option<TleInput>) -> Result<Satellite, ApiError> {
    match input {
        Some(tle) => Ok(Satellite::from_lines(tle.name, &tle.line1, &tle.line2)?),
        None => {
            let default = state
                .config
                .defaults
                .satellite
                .as_ref()
                .ok_or_else(|| ApiError::Validation("no satellite provided and no default configured".into()))?;
            Ok(Satellite::from_lines(
                Some(default.name.clone()),
                &default.line1,
                &default.line2,
            )?)
        }
    }
}

fn resolve_station(
    input: Option<StationInput>,
    fallback: &StationConfig,
) -> Result<GroundStation, ApiError> {
    let station = match input {
        Some(s) => GroundStation::new(s.name, s.latitude_deg, s.longitude_deg, s.altitude_m),
        None => fallback.to_station(),
    };
    validate_station(&station)?;
    Ok(station)
}

fn validate_station(station: &GroundStation) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&station.latitude_deg) {
        return Err(ApiError::Validation(format!(
            "{}: latitude out of range: {}",
            station.name, station.latitude_deg
        )));
    }
    if !(-180.0..=360.0).contains(&station.longitude_deg) {
        return Err(ApiError::Validation(format!(
            "{}: longitude out of range: {}",
            station.name, station.longitude_deg
        )));
    }
    Ok(())
}

/// One UTC calendar day, 00:00:00 through 23:59:59.
pub fn day_window(date: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| ApiError::Validation(format!("invalid date '{}': {}", date, e)))?;
    let start = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ApiError::Validation(format!("invalid date '{}'", date)))?
        .and_utc();
    let end = day
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| ApiError::Validation(format!("invalid date '{}'", date)))?
        .and_utc();
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_window_spans_the_calendar_day() {
        let (start, end) = day_window("2025-05-05").unwrap();
        assert_eq!(start.to_rfc3339(), "2025-05-05T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-05-05T23:59:59+00:00");
    }

    #[test]
    fn day_window_rejects_other_shapes() {
        assert!(day_window("05/05/2025").is_err());
        assert!(day_window("2025-05-05 10:00:00").is_err());
    }

    #[test]
    fn station_validation_catches_bad_coordinates() {
        let bad = GroundStation::new("Nowhere", 95.0, 0.0, 0.0);
        assert!(validate_station(&bad).is_err());
        let ok = GroundStation::new("Sweden", 65.337, 21.425, 21.0);
        assert!(validate_station(&ok).is_ok());
    }
}
