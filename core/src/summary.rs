//! The per-run Summary: built from three queries, written as pretty JSON.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::ReportResult,
    store::TripStore,
    types::{CityFare, TopTrip},
};

pub const STDOUT_HEADER: &str = "=== Summary ===";

/// Field order here is the key order in the output JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_trips: i64,
    pub avg_fare_by_city: Vec<CityFare>,
    pub top_by_minutes: Vec<TopTrip>,
}

pub fn compute_summary<S>(store: &mut S, top_n: u32) -> ReportResult<Summary>
where
    S: TripStore + ?Sized,
{
    let total_trips = store.total_trips()?;
    let avg_fare_by_city = store.avg_fare_by_city()?;
    let top_by_minutes = store.top_by_minutes(top_n)?;

    log::info!(
        "summary: {total_trips} trips, {} cities, top {} by minutes",
        avg_fare_by_city.len(),
        top_by_minutes.len()
    );

    Ok(Summary {
        total_trips,
        avg_fare_by_city,
        top_by_minutes,
    })
}

/// Pretty JSON with two-space indentation.
pub fn render_json(summary: &Summary) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Write the summary to `path` (creating its directory if needed),
/// then print the header and the same JSON to `out`.
pub fn persist_and_emit<W: Write>(
    summary: &Summary,
    path: &Path,
    out: &mut W,
) -> ReportResult<()> {
    let json = render_json(summary)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, &json)?;
    log::info!("wrote {}", path.display());

    writeln!(out, "{STDOUT_HEADER}")?;
    writeln!(out, "{json}")?;
    out.flush()?;
    Ok(())
}
