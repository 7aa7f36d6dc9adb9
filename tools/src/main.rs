//! trip-report: waits for the trips database, summarises it, writes JSON.
//!
//! Usage:
//!   trip-report                          # Postgres, configured via DB_* / APP_* env vars
//!   trip-report --out ./summary.json
//!   trip-report --sqlite trips.db        # local SQLite fixture, seeded if empty

use anyhow::Result;
use std::env;
use std::io;
use std::path::PathBuf;
use trip_report_core::{
    config::ReportConfig,
    report,
    store::{PgTripStore, SqliteTripStore},
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mut cfg = ReportConfig::from_env()?;
    if let Some(out) = flag_value(&args, "--out") {
        cfg.output_path = PathBuf::from(out);
    }
    let sqlite = flag_value(&args, "--sqlite");

    let policy = cfg.retry_policy();
    let mut stdout = io::stdout().lock();

    match sqlite {
        Some(path) => {
            log::info!("reading trips from sqlite database {path}");
            report::generate(
                &policy,
                || {
                    let store = SqliteTripStore::open(path)?;
                    store.prepare_fixture()?;
                    Ok(store)
                },
                cfg.top_n,
                &cfg.output_path,
                &mut stdout,
            )?;
        }
        None => {
            log::info!(
                "reading trips from postgres at {}:{}/{}",
                cfg.db.host,
                cfg.db.port,
                cfg.db.database
            );
            report::generate(
                &policy,
                || PgTripStore::connect(&cfg.db, cfg.connect_timeout),
                cfg.top_n,
                &cfg.output_path,
                &mut stdout,
            )?;
        }
    }

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
