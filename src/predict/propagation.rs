use chrono::{DateTime, SubsecRound, Utc};

use crate::predict::error::PredictError;
use crate::predict::ground_station::{GroundStation, WGS84_A_KM, WGS84_E2};
use crate::predict::satellite::Satellite;
use crate::predict::types::{Subpoint, Topocentric};

/// Observer-relative geometry for `station` at `timestamp`.
pub fn observe(
    satellite: &Satellite,
    station: &GroundStation,
    timestamp: DateTime<Utc>,
) -> Result<Topocentric, PredictError> {
    let sat_ecef = propagate_ecef(satellite, timestamp)?;
    let sta_ecef = station.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let enu = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth_deg = enu.0.atan2(enu.1).to_degrees().rem_euclid(360.0);
    let elevation_deg = if range_km > 0.0 {
        (enu.2 / range_km).asin().to_degrees()
    } else {
        0.0
    };

    Ok(Topocentric {
        azimuth_deg,
        elevation_deg,
        range_km,
    })
}

/// Geodetic point directly beneath the satellite at `timestamp`.
pub fn subpoint(satellite: &Satellite, timestamp: DateTime<Utc>) -> Result<Subpoint, PredictError> {
    let ecef = propagate_ecef(satellite, timestamp)?;
    let (latitude_deg, longitude_deg, height_km) = ecef_to_geodetic(ecef);

    Ok(Subpoint {
        time: timestamp.trunc_subsecs(0),
        satellite: satellite.name.clone(),
        latitude_deg: round6(latitude_deg),
        longitude_deg: round6(longitude_deg),
        elevation_m: round2(height_km * 1000.0),
    })
}

/// SGP4 state at `timestamp`, rotated from TEME into ECEF.
fn propagate_ecef(satellite: &Satellite, timestamp: DateTime<Utc>) -> Result<[f64; 3], PredictError> {
    let minutes = satellite
        .elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let prediction = satellite
        .constants
        .propagate(minutes)
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    Ok(teme_to_ecef(prediction.position, sidereal))
}

fn teme_to_ecef(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// ECEF to geodetic latitude/longitude/height, Bowring's iteration on WGS-84.
fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let p = (x * x + y * y).sqrt();
    let longitude = y.atan2(x);

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..5 {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        lat = (z + WGS84_E2 * n * sin_lat).atan2(p);
    }

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let height_km = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        z.abs() / sin_lat.abs() - n * (1.0 - WGS84_E2)
    };

    (lat.to_degrees(), longitude.to_degrees(), height_km)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LINE1: &str = "1 62688U 25009CH  25124.74930353  .00015765  00000+0  69252-3 0  9994";
    const LINE2: &str = "2 62688  97.4284 205.7904 0001127  28.6595 331.4703 15.22003295 16668";

    fn satellite() -> Satellite {
        Satellite::from_lines(Some("Bluebon".into()), LINE1, LINE2).unwrap()
    }

    fn station() -> GroundStation {
        GroundStation::new("Sweden", 65.337, 21.425, 21.0)
    }

    fn t(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 5, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn observe_returns_physical_angles() {
        let topo = observe(&satellite(), &station(), t(12, 0, 0)).unwrap();
        assert!(topo.elevation_deg >= -90.0 && topo.elevation_deg <= 90.0);
        assert!(topo.azimuth_deg >= 0.0 && topo.azimuth_deg < 360.0);
        assert!(topo.range_km > 0.0);
    }

    #[test]
    fn subpoint_stays_on_the_ellipsoid_grid() {
        let sp = subpoint(&satellite(), t(12, 0, 0)).unwrap();
        assert!(sp.latitude_deg.abs() <= 90.0);
        assert!(sp.longitude_deg.abs() <= 180.0);
        // LEO: height above the ellipsoid in the hundreds of kilometers
        assert!(sp.elevation_m > 200_000.0 && sp.elevation_m < 2_000_000.0);
    }

    #[test]
    fn subpoint_latitude_bounded_by_inclination() {
        // 97.43 deg inclination: |latitude| can never exceed 180 - i
        let sat = satellite();
        for hour in 0..24 {
            let sp = subpoint(&sat, t(hour, 0, 0)).unwrap();
            assert!(sp.latitude_deg.abs() <= 180.0 - 97.4284 + 0.1);
        }
    }

    #[test]
    fn ecef_roundtrip_through_geodetic() {
        let station = station();
        let ecef = station.position_ecef_km();
        let (lat, lon, height_km) = ecef_to_geodetic(ecef);
        assert!((lat - station.latitude_deg).abs() < 1e-6);
        assert!((lon - station.longitude_deg).abs() < 1e-6);
        assert!((height_km * 1000.0 - station.altitude_m).abs() < 1.0);
    }
}
