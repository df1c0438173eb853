use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire format for every pass/window timestamp: UTC, one-second resolution.
/// Downstream consumers re-parse this exact shape, so it is a contract.
pub mod wire_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, FORMAT).map(|naive| naive.and_utc())
    }
}

/// Observer-relative geometry at one instant.
#[derive(Debug, Clone, Copy)]
pub struct Topocentric {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
}

/// One rise/culminate/set sequence above the elevation threshold for one
/// ground station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Pass {
    #[serde(with = "wire_time")]
    #[schema(value_type = String, example = "2025-05-05 10:00:00")]
    pub rise_time: DateTime<Utc>,
    #[serde(with = "wire_time")]
    #[schema(value_type = String, example = "2025-05-05 10:05:00")]
    pub culmination_time: DateTime<Utc>,
    #[serde(with = "wire_time")]
    #[schema(value_type = String, example = "2025-05-05 10:10:00")]
    pub set_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
}

impl Pass {
    pub fn duration_seconds(&self) -> i64 {
        (self.set_time - self.rise_time).num_seconds()
    }
}

/// Interval during which the satellite is above threshold at both stations.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommonWindow {
    #[serde(with = "wire_time")]
    #[schema(value_type = String, example = "2025-05-05 10:02:00")]
    pub rise_time: DateTime<Utc>,
    #[serde(with = "wire_time")]
    #[schema(value_type = String, example = "2025-05-05 10:10:00")]
    pub set_time: DateTime<Utc>,
    /// Worst case of the two stations' peak elevations over their full
    /// passes, not recomputed over the overlap itself.
    pub max_elevation_deg: f64,
    pub duration_seconds: i64,
    pub duration_str: String,
    pub station1_pass: Pass,
    pub station2_pass: Pass,
}

/// Geodetic point directly beneath the satellite.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Subpoint {
    #[serde(with = "wire_time")]
    #[schema(value_type = String, example = "2025-05-05 12:00:00")]
    pub time: DateTime<Utc>,
    pub satellite: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
}
