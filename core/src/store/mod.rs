//! Trip store access.
//!
//! RULE: Only the store modules talk to the database.
//! The summary and report layers go through `TripStore`; they never execute SQL.

mod postgres;
mod sqlite;

pub use postgres::PgTripStore;
pub use sqlite::SqliteTripStore;

use crate::{
    error::ReportResult,
    types::{CityFare, TopTrip},
};

/// The three read-only queries the report runs against the `trips` table.
pub trait TripStore {
    /// Number of rows in `trips`.
    fn total_trips(&mut self) -> ReportResult<i64>;

    /// One row per distinct city, ordered by city name.
    /// `avg_fare` is the mean fare rounded to two decimal places.
    fn avg_fare_by_city(&mut self) -> ReportResult<Vec<CityFare>>;

    /// Up to `limit` rows ordered by `minutes` descending.
    /// Ties come back in whatever order the store returns them.
    fn top_by_minutes(&mut self, limit: u32) -> ReportResult<Vec<TopTrip>>;
}
