//! Postgres backend for the upstream trips store.
//!
//! Callers see a blocking API: the store owns a current-thread tokio
//! runtime and drives each sqlx query to completion on it.
//! NUMERIC columns are cast to float8 in SQL so rows decode straight into f64.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use tokio::runtime::{Builder, Runtime};

use super::TripStore;
use crate::{
    config::DbConfig,
    error::{ReportError, ReportResult},
    types::{CityFare, TopTrip},
};

pub struct PgTripStore {
    runtime: Runtime,
    // Only None once Drop has taken it to close.
    conn: Option<PgConnection>,
    // Bounds the graceful close in Drop as well as the connect.
    timeout: Duration,
}

impl PgTripStore {
    /// Open one connection, giving up after `timeout`.
    pub fn connect(db: &DbConfig, timeout: Duration) -> ReportResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let opts = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.user)
            .password(&db.password)
            .database(&db.database);

        log::debug!("connecting to postgres at {}:{}/{}", db.host, db.port, db.database);
        let conn = runtime
            .block_on(async { tokio::time::timeout(timeout, opts.connect()).await })
            .map_err(|_| ReportError::ConnectTimeout { timeout })??;

        Ok(Self {
            runtime,
            conn: Some(conn),
            timeout,
        })
    }

    fn parts(&mut self) -> ReportResult<(&Runtime, &mut PgConnection)> {
        match self.conn.as_mut() {
            Some(conn) => Ok((&self.runtime, conn)),
            None => Err(anyhow::anyhow!("postgres connection already closed").into()),
        }
    }
}

impl TripStore for PgTripStore {
    fn total_trips(&mut self) -> ReportResult<i64> {
        let (runtime, conn) = self.parts()?;
        let (count,) = runtime.block_on(
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM trips").fetch_one(conn),
        )?;
        Ok(count)
    }

    fn avg_fare_by_city(&mut self) -> ReportResult<Vec<CityFare>> {
        let (runtime, conn) = self.parts()?;
        let rows = runtime.block_on(
            sqlx::query_as::<_, (String, f64)>(
                "SELECT city, ROUND(AVG(fare)::numeric, 2)::float8
                 FROM trips GROUP BY city ORDER BY city ASC",
            )
            .fetch_all(conn),
        )?;
        Ok(rows
            .into_iter()
            .map(|(city, avg_fare)| CityFare { city, avg_fare })
            .collect())
    }

    fn top_by_minutes(&mut self, limit: u32) -> ReportResult<Vec<TopTrip>> {
        let (runtime, conn) = self.parts()?;
        let rows = runtime.block_on(
            sqlx::query_as::<_, (String, i64, f64)>(
                "SELECT city, minutes::int8, fare::float8
                 FROM trips ORDER BY minutes DESC LIMIT $1",
            )
            .bind(i64::from(limit))
            .fetch_all(conn),
        )?;
        Ok(rows
            .into_iter()
            .map(|(city, minutes, fare)| TopTrip { city, minutes, fare })
            .collect())
    }
}

impl Drop for PgTripStore {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            let closed = self
                .runtime
                .block_on(async { tokio::time::timeout(self.timeout, conn.close()).await });
            match closed {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::warn!("error closing postgres connection: {e}"),
                Err(_) => log::warn!(
                    "postgres close did not finish within {:?}; dropping socket",
                    self.timeout
                ),
            }
        }
    }
}
