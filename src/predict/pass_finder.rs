use chrono::{DateTime, SubsecRound, Utc};

use crate::predict::error::PredictError;
use crate::predict::events::{find_events, ElevationEvent, EventKind};
use crate::predict::ground_station::GroundStation;
use crate::predict::propagation::{observe, round2};
use crate::predict::satellite::Satellite;
use crate::predict::types::Pass;

/// Find all passes of `satellite` over `station` within `[start, end]` that
/// reach `min_elevation_deg`, in chronological order.
///
/// The event sequence is consumed in fixed groups of three; only an exact
/// rise/culminate/set group becomes a pass. A pass cut short by the window
/// boundary leaves a truncated group and is dropped without comment.
pub fn find_passes(
    satellite: &Satellite,
    station: &GroundStation,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_elevation_deg: f64,
) -> Result<Vec<Pass>, PredictError> {
    let events = find_events(satellite, station, start, end, min_elevation_deg)?;

    let mut passes = Vec::new();
    for (rise, culminate, set) in complete_triples(&events) {
        let topocentric = observe(satellite, station, culminate)?;
        passes.push(Pass {
            rise_time: rise.trunc_subsecs(0),
            culmination_time: culminate.trunc_subsecs(0),
            set_time: set.trunc_subsecs(0),
            max_elevation_deg: round2(topocentric.elevation_deg),
        });
    }

    Ok(passes)
}

type Triple = (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>);

fn complete_triples(events: &[ElevationEvent]) -> Vec<Triple> {
    events
        .chunks_exact(3)
        .filter_map(|group| match group {
            [rise, culminate, set]
                if rise.kind == EventKind::Rise
                    && culminate.kind == EventKind::Culminate
                    && set.kind == EventKind::Set =>
            {
                Some((rise.time, culminate.time, set.time))
            }
            _ => None,
        })
        .collect()
}
