use crate::predict::types::{CommonWindow, Pass};

/// Intersect two stations' pass lists, sorted ascending by common rise.
///
/// Every overlapping pair yields its own window; touching endpoints count as
/// overlap and result windows are never merged or deduplicated. Passes from
/// a single station within one day do not overlap each other, so in practice
/// the windows are disjoint as well.
pub fn find_common_windows(
    passes_station1: &[Pass],
    passes_station2: &[Pass],
) -> Vec<CommonWindow> {
    let mut windows = Vec::new();

    for pass1 in passes_station1 {
        for pass2 in passes_station2 {
            if pass1.rise_time <= pass2.set_time && pass2.rise_time <= pass1.set_time {
                let rise_time = pass1.rise_time.max(pass2.rise_time);
                let set_time = pass1.set_time.min(pass2.set_time);
                let duration_seconds = (set_time - rise_time).num_seconds();

                windows.push(CommonWindow {
                    rise_time,
                    set_time,
                    max_elevation_deg: pass1.max_elevation_deg.min(pass2.max_elevation_deg),
                    duration_seconds,
                    duration_str: format_duration(duration_seconds),
                    station1_pass: pass1.clone(),
                    station2_pass: pass2.clone(),
                });
            }
        }
    }

    windows.sort_by_key(|window| window.rise_time);
    windows
}

fn format_duration(seconds: i64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}
