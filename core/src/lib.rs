//! trip-report core: reads the seeded trips table and builds the JSON summary.

pub mod config;
pub mod error;
pub mod report;
pub mod retry;
pub mod store;
pub mod summary;
pub mod types;
