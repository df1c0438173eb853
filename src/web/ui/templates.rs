use askama::Template;
use askama_web::WebTemplate;

use crate::web::config::StationConfig;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub station1: StationConfig,
    pub station2: StationConfig,
    pub min_elevation_deg: f64,
    pub default_date: String,
    pub tle_name: String,
    pub tle_line1: String,
    pub tle_line2: String,
}
