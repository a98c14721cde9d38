//! Aggregate availability statistics for station-status snapshots.

use serde::Serialize;
use serde_json::Value;

/// The one feed kind stats extraction understands.
pub const STATION_STATUS: &str = "station_status";

/// Summed bike and dock availability over every station in a snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StationTotals {
    pub total_bikes: i64,
    pub available_docks: i64,
}

/// Computes availability totals for a recognized feed kind.
///
/// Returns `None` for any feed name other than `station_status`, so the
/// caller never records stats for a feed it cannot interpret. Within a
/// snapshot, a station with a missing or null count contributes 0 to that
/// sum; partial data never aborts the aggregation, and an empty or absent
/// station list yields `{0, 0}`.
///
/// Pure function: no I/O, deterministic given its input.
pub fn extract_stats(feed_name: &str, snapshot: &Value) -> Option<StationTotals> {
    if feed_name != STATION_STATUS {
        return None;
    }

    let mut totals = StationTotals::default();

    if let Some(stations) = snapshot
        .get("data")
        .and_then(|data| data.get("stations"))
        .and_then(Value::as_array)
    {
        for station in stations {
            totals.total_bikes += count_field(station, "num_bikes_available");
            totals.available_docks += count_field(station, "num_docks_available");
        }
    }

    Some(totals)
}

fn count_field(station: &Value, field: &str) -> i64 {
    station.get(field).and_then(Value::as_i64).unwrap_or(0)
}
