//! Presentation transforms: numbered table rows for the pass/window lists
//! and the records the timeline widget consumes. Pure mapping, no filtering.

use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::{CommonWindow, Pass};

/// One row of a per-station pass table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PassRow {
    pub nr: usize,
    pub date: String,
    /// Time of day, seconds truncated for compact display.
    pub rise_time: String,
    pub set_time: String,
    pub max_elevation: String,
    pub duration_seconds: i64,
}

/// One row of the common-window table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WindowRow {
    pub nr: usize,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub max_elevation: String,
    pub duration: String,
    pub duration_seconds: i64,
}

/// One bar on the visibility timeline.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimelineItem {
    pub group: String,
    pub start: String,
    pub end: String,
    pub content: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(rename = "className")]
    pub class_name: String,
}

pub fn pass_rows(passes: &[Pass]) -> Vec<PassRow> {
    passes
        .iter()
        .enumerate()
        .map(|(i, pass)| PassRow {
            nr: i + 1,
            date: pass.rise_time.format("%Y-%m-%d").to_string(),
            rise_time: pass.rise_time.format("%H:%M").to_string(),
            set_time: pass.set_time.format("%H:%M").to_string(),
            max_elevation: format!("{:.2}°", pass.max_elevation_deg),
            duration_seconds: pass.duration_seconds(),
        })
        .collect()
}

pub fn window_rows(windows: &[CommonWindow]) -> Vec<WindowRow> {
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| WindowRow {
            nr: i + 1,
            date: window.rise_time.format("%Y-%m-%d").to_string(),
            start_time: window.rise_time.format("%H:%M").to_string(),
            end_time: window.set_time.format("%H:%M").to_string(),
            max_elevation: format!("{:.2}°", window.max_elevation_deg),
            duration: window.duration_str.clone(),
            duration_seconds: window.duration_seconds,
        })
        .collect()
}

/// Timeline records: one group per station plus a "Common" group, in input
/// order.
pub fn timeline_items(
    station1_name: &str,
    passes_station1: &[Pass],
    station2_name: &str,
    passes_station2: &[Pass],
    common_windows: &[CommonWindow],
) -> Vec<TimelineItem> {
    let mut items = Vec::new();

    for (group, class_name, passes) in [
        (station1_name, "gs1-pass", passes_station1),
        (station2_name, "gs2-pass", passes_station2),
    ] {
        items.extend(passes.iter().map(|pass| TimelineItem {
            group: group.to_string(),
            start: wire(pass.rise_time),
            end: wire(pass.set_time),
            content: format!("Max El: {:.2}°", pass.max_elevation_deg),
            item_type: "range".to_string(),
            class_name: class_name.to_string(),
        }));
    }

    items.extend(common_windows.iter().map(|window| TimelineItem {
        group: "Common".to_string(),
        start: wire(window.rise_time),
        end: wire(window.set_time),
        content: format!(
            "Max El: {:.2}° | {}",
            window.max_elevation_deg, window.duration_str
        ),
        item_type: "range".to_string(),
        class_name: "common-window".to_string(),
    }));

    items
}

fn wire(time: chrono::DateTime<chrono::Utc>) -> String {
    time.format(crate::predict::wire_time::FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{find_common_windows, wire_time};
    use chrono::{DateTime, Utc};

    fn t(s: &str) -> DateTime<Utc> {
        wire_time::parse(s).unwrap()
    }

    fn pass(rise: &str, culminate: &str, set: &str, max_elevation_deg: f64) -> Pass {
        Pass {
            rise_time: t(rise),
            culmination_time: t(culminate),
            set_time: t(set),
            max_elevation_deg,
        }
    }

    #[test]
    fn pass_rows_are_numbered_from_one() {
        let passes = [
            pass("2025-05-05 10:00:00", "2025-05-05 10:05:00", "2025-05-05 10:10:30", 45.125),
            pass("2025-05-05 11:40:00", "2025-05-05 11:45:00", "2025-05-05 11:50:00", 12.5),
        ];
        let rows = pass_rows(&passes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].nr, 1);
        assert_eq!(rows[1].nr, 2);
        assert_eq!(rows[0].date, "2025-05-05");
        assert_eq!(rows[0].rise_time, "10:00");
        assert_eq!(rows[0].set_time, "10:10");
        assert_eq!(rows[0].max_elevation, "45.13°");
        assert_eq!(rows[0].duration_seconds, 630);
    }

    #[test]
    fn window_rows_carry_the_duration_string() {
        let a = [pass("2025-05-05 10:00:00", "2025-05-05 10:05:00", "2025-05-05 10:10:00", 45.0)];
        let b = [pass("2025-05-05 10:02:00", "2025-05-05 10:07:00", "2025-05-05 10:12:00", 40.0)];
        let rows = window_rows(&find_common_windows(&a, &b));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].start_time, "10:02");
        assert_eq!(rows[0].end_time, "10:10");
        assert_eq!(rows[0].max_elevation, "40.00°");
        assert_eq!(rows[0].duration, "8m 0s");
    }

    #[test]
    fn timeline_has_one_group_per_station_plus_common() {
        let a = [pass("2025-05-05 10:00:00", "2025-05-05 10:05:00", "2025-05-05 10:10:00", 45.0)];
        let b = [pass("2025-05-05 10:02:00", "2025-05-05 10:07:00", "2025-05-05 10:12:00", 40.0)];
        let windows = find_common_windows(&a, &b);

        let items = timeline_items("Sweden", &a, "Poland", &b, &windows);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].group, "Sweden");
        assert_eq!(items[1].group, "Poland");
        assert_eq!(items[2].group, "Common");
        assert_eq!(items[0].class_name, "gs1-pass");
        assert_eq!(items[2].class_name, "common-window");
        assert_eq!(items[2].start, "2025-05-05 10:02:00");
        assert_eq!(items[2].content, "Max El: 40.00° | 8m 0s");
        for item in &items {
            assert_eq!(item.item_type, "range");
        }
    }

    #[test]
    fn timeline_serializes_widget_field_names() {
        let a = [pass("2025-05-05 10:00:00", "2025-05-05 10:05:00", "2025-05-05 10:10:00", 45.0)];
        let items = timeline_items("Sweden", &a, "Poland", &[], &[]);
        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json[0]["type"], "range");
        assert_eq!(json[0]["className"], "gs1-pass");
    }
}
