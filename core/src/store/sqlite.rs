//! Local SQLite backend: same schema and queries as the upstream store.
//!
//! Used by the tests and by `trip-report --sqlite` to run the report
//! without a Postgres server.

use rusqlite::{params, Connection, OpenFlags};

use super::TripStore;
use crate::{
    error::ReportResult,
    types::{CityFare, TopTrip, TripRecord},
};

pub struct SqliteTripStore {
    conn: Connection,
}

impl SqliteTripStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> ReportResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ReportResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create the `trips` table if it does not exist yet.
    pub fn migrate(&self) -> ReportResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_trips.sql"))?;
        Ok(())
    }

    /// Insert the six fixture rows the upstream store is seeded with.
    pub fn seed_fixture(&self) -> ReportResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/002_seed_trips.sql"))?;
        Ok(())
    }

    /// Migrate, then seed only when the table is still empty.
    pub fn prepare_fixture(&self) -> ReportResult<()> {
        self.migrate()?;
        if self.trip_count()? == 0 {
            self.seed_fixture()?;
            log::info!("seeded local trips fixture");
        }
        Ok(())
    }

    pub fn insert_trip(&self, city: &str, minutes: i64, fare: f64) -> ReportResult<i64> {
        self.conn.execute(
            "INSERT INTO trips (city, minutes, fare) VALUES (?1, ?2, ?3)",
            params![city, minutes, fare],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn trip_count(&self) -> ReportResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM trips", [], |row| row.get(0))?;
        Ok(count)
    }

    /// All rows in insertion order.
    pub fn trips(&self) -> ReportResult<Vec<TripRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, city, minutes, CAST(fare AS REAL) FROM trips ORDER BY id ASC",
        )?;
        let trips = stmt
            .query_map([], |row| {
                Ok(TripRecord {
                    id: row.get(0)?,
                    city: row.get(1)?,
                    minutes: row.get(2)?,
                    fare: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(trips)
    }
}

impl TripStore for SqliteTripStore {
    fn total_trips(&mut self) -> ReportResult<i64> {
        self.trip_count()
    }

    fn avg_fare_by_city(&mut self) -> ReportResult<Vec<CityFare>> {
        // Sum whole cents so the mean can be rounded exactly, as NUMERIC would.
        let mut stmt = self.conn.prepare(
            "SELECT city, SUM(CAST(ROUND(CAST(fare AS REAL) * 100) AS INTEGER)), COUNT(*)
             FROM trips GROUP BY city ORDER BY city ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let city: String = row.get(0)?;
                let cents: i64 = row.get(1)?;
                let count: i64 = row.get(2)?;
                Ok(CityFare {
                    city,
                    avg_fare: mean_cents_half_up(cents, count) as f64 / 100.0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn top_by_minutes(&mut self, limit: u32) -> ReportResult<Vec<TopTrip>> {
        let mut stmt = self.conn.prepare(
            "SELECT city, minutes, CAST(fare AS REAL)
             FROM trips ORDER BY minutes DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(TopTrip {
                    city: row.get(0)?,
                    minutes: row.get(1)?,
                    fare: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Mean of `count` amounts totalling `cents`, rounded half away from zero.
fn mean_cents_half_up(cents: i64, count: i64) -> i64 {
    if count == 0 {
        return 0;
    }
    let half_up = (2 * cents.abs() + count) / (2 * count);
    if cents < 0 {
        -half_up
    } else {
        half_up
    }
}

#[cfg(test)]
mod tests {
    use super::mean_cents_half_up;

    #[test]
    fn half_cent_rounds_up() {
        assert_eq!(mean_cents_half_up(2001, 2), 1001);
        assert_eq!(mean_cents_half_up(535, 2), 268);
        assert_eq!(mean_cents_half_up(3002, 3), 1001);
        assert_eq!(mean_cents_half_up(3250, 2), 1625);
    }

    #[test]
    fn negative_totals_round_away_from_zero() {
        assert_eq!(mean_cents_half_up(-2001, 2), -1001);
    }
}
