use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;
use crate::predict::ground_station::GroundStation;
use crate::predict::propagation::observe;
use crate::predict::satellite::Satellite;

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EventKind {
    Rise,
    Culminate,
    Set,
}

/// An elevation-threshold crossing, tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub struct ElevationEvent {
    pub time: DateTime<Utc>,
    pub kind: EventKind,
}

/// A visibility segment being scanned: when it rose (None if the satellite
/// was already up at the window start) and the best coarse sample so far.
struct Segment {
    rise: Option<DateTime<Utc>>,
    peak_time: DateTime<Utc>,
    peak_elevation: f64,
}

/// Chronological rise/culminate/set events for `station` within
/// `[start, end]`, where rise and set cross `min_elevation_deg`.
///
/// Coarse scan at one-minute steps, crossings refined to one second by
/// bisection, culmination refined by a fine scan around the coarse peak.
/// A pass in progress at a window boundary yields a truncated event group:
/// no Rise when already visible at `start`, no Set when still visible at
/// `end`, and no Culminate when the peak falls on the boundary itself.
pub fn find_events(
    satellite: &Satellite,
    station: &GroundStation,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_elevation_deg: f64,
) -> Result<Vec<ElevationEvent>, PredictError> {
    if start >= end {
        return Err(PredictError::EmptyWindow(start, end));
    }

    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let mut events = Vec::new();
    let mut segment: Option<Segment> = None;
    let mut prev_time = start;
    let mut prev_above: Option<bool> = None;
    let mut cursor = start;

    loop {
        let sample = observe(satellite, station, cursor)?;
        let above = sample.elevation_deg >= min_elevation_deg;

        if above {
            if let Some(seg) = segment.as_mut() {
                if sample.elevation_deg > seg.peak_elevation {
                    seg.peak_elevation = sample.elevation_deg;
                    seg.peak_time = cursor;
                }
            } else {
                let rise = match prev_above {
                    Some(false) => Some(refine_crossing(
                        satellite,
                        station,
                        prev_time,
                        cursor,
                        true,
                        min_elevation_deg,
                    )?),
                    _ => None, // already visible at the window start
                };
                if let Some(time) = rise {
                    events.push(ElevationEvent {
                        time,
                        kind: EventKind::Rise,
                    });
                }
                segment = Some(Segment {
                    rise,
                    peak_time: cursor,
                    peak_elevation: sample.elevation_deg,
                });
            }
        } else if let Some(seg) = segment.take() {
            let set = refine_crossing(
                satellite,
                station,
                prev_time,
                cursor,
                false,
                min_elevation_deg,
            )?;
            close_segment(satellite, station, &seg, start, set, &mut events)?;
            events.push(ElevationEvent {
                time: set,
                kind: EventKind::Set,
            });
        }

        prev_time = cursor;
        prev_above = Some(above);
        if cursor >= end {
            break;
        }
        cursor = (cursor + coarse_step).min(end);
    }

    // Pass still in progress at the window end: culmination only.
    if let Some(seg) = segment.take() {
        close_segment(satellite, station, &seg, start, end, &mut events)?;
    }

    for event in &events {
        log::debug!("{} @ {} for {}", event.kind, event.time, station.name);
    }

    Ok(events)
}

/// Refine the segment peak and emit the Culminate event, unless the peak
/// sits on the window boundary (the true culmination happened outside it).
fn close_segment(
    satellite: &Satellite,
    station: &GroundStation,
    segment: &Segment,
    window_start: DateTime<Utc>,
    segment_end: DateTime<Utc>,
    events: &mut Vec<ElevationEvent>,
) -> Result<(), PredictError> {
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let segment_start = segment.rise.unwrap_or(window_start);
    let low = segment_start.max(segment.peak_time - coarse_step);
    let high = segment_end.min(segment.peak_time + coarse_step);
    let peak = refine_peak(satellite, station, low, high)?;

    if peak > segment_start && peak < segment_end {
        events.push(ElevationEvent {
            time: peak,
            kind: EventKind::Culminate,
        });
    }
    Ok(())
}

/// Binary search for the exact threshold crossing between two samples that
/// straddle it.
fn refine_crossing(
    satellite: &Satellite,
    station: &GroundStation,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
    min_elevation_deg: f64,
) -> Result<DateTime<Utc>, PredictError> {
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let above = observe(satellite, station, mid)?.elevation_deg >= min_elevation_deg;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(high)
}

/// Fine scan for the elevation maximum between `low` and `high`.
fn refine_peak(
    satellite: &Satellite,
    station: &GroundStation,
    low: DateTime<Utc>,
    high: DateTime<Utc>,
) -> Result<DateTime<Utc>, PredictError> {
    let fine_step = Duration::seconds(FINE_STEP_SECONDS);
    let mut best_time = low;
    let mut best_elevation = f64::NEG_INFINITY;
    let mut cursor = low;

    while cursor <= high {
        let sample = observe(satellite, station, cursor)?;
        if sample.elevation_deg > best_elevation {
            best_elevation = sample.elevation_deg;
            best_time = cursor;
        }
        cursor += fine_step;
    }

    Ok(best_time)
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

    fn sweden() -> GroundStation {
        GroundStation::new("Sweden", 65.337, 21.425, 21.0)
    }

    fn day() -> (DateTime<Utc>, DateTime<Utc>) {
        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        (
            date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
            date.and_hms_opt(23, 59, 59).unwrap().and_utc(),
        )
    }

    #[test]
    fn events_are_chronological_and_inside_the_window() {
        let (start, end) = day();
        let events = find_events(&satellite(), &sweden(), start, end, 0.0).unwrap();
        // A polar LEO seen from 65N crosses the horizon many times per day.
        assert!(!events.is_empty());
        for pair in events.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
        for event in &events {
            assert!(event.time >= start && event.time <= end);
        }
    }

    #[test]
    fn rises_and_sets_alternate() {
        let (start, end) = day();
        let events = find_events(&satellite(), &sweden(), start, end, 0.0).unwrap();
        let crossings: Vec<EventKind> = events
            .iter()
            .map(|e| e.kind)
            .filter(|k| *k != EventKind::Culminate)
            .collect();
        for pair in crossings.windows(2) {
            assert_ne!(pair[0], pair[1], "two {}s in a row", pair[0]);
        }
    }

    #[test]
    fn crossings_sit_on_the_threshold() {
        let (start, end) = day();
        let sat = satellite();
        let station = sweden();
        let min_el = 3.0;
        let events = find_events(&sat, &station, start, end, min_el).unwrap();
        for event in events.iter().filter(|e| e.kind != EventKind::Culminate) {
            let el = observe(&sat, &station, event.time).unwrap().elevation_deg;
            // refined to one second; the satellite moves well under a degree
            // of elevation in that time near the threshold
            assert!((el - min_el).abs() < 1.0, "crossing at {} deg", el);
        }
    }

    #[test]
    fn empty_window_is_an_error() {
        let (start, _) = day();
        assert!(matches!(
            find_events(&satellite(), &sweden(), start, start, 0.0),
            Err(PredictError::EmptyWindow(_, _))
        ));
    }
}
