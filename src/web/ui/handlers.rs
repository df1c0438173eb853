use axum::{extract::State, response::IntoResponse};
use chrono::{Duration, Utc};

use crate::web::server::AppState;

use super::templates::DashboardTemplate;

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    let default_date = (Utc::now() + Duration::days(1)).format("%Y-%m-%d").to_string();

    let (tle_name, tle_line1, tle_line2) = match &config.defaults.satellite {
        Some(tle) => (tle.name.clone(), tle.line1.clone(), tle.line2.clone()),
        None => (String::new(), String::new(), String::new()),
    };

    DashboardTemplate {
        station1: config.station1.clone(),
        station2: config.station2.clone(),
        min_elevation_deg: config.defaults.min_elevation_deg,
        default_date,
        tle_name,
        tle_line1,
        tle_line2,
    }
}
