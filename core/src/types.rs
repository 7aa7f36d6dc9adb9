//! Row and summary types shared by the store backends and the report.

use serde::{Deserialize, Serialize};

/// One row of the upstream `trips` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: i64,
    pub city: String,
    pub minutes: i64,
    pub fare: f64,
}

/// Average fare for a single city, rounded to the stored two-digit precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityFare {
    pub city: String,
    pub avg_fare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTrip {
    pub city: String,
    pub minutes: i64,
    pub fare: f64,
}
