//! One report run: connect, query, release, write.

use std::io::Write;
use std::path::Path;

use crate::{
    error::ReportResult,
    retry::{connect_with_retry, RetryPolicy},
    store::TripStore,
    summary::{compute_summary, persist_and_emit, Summary},
};

/// Run a full report.
///
/// The store is dropped (and its connection released) before anything is
/// written, and nothing is written unless every query succeeded.
pub fn generate<S, F, W>(
    policy: &RetryPolicy,
    connect: F,
    top_n: u32,
    output: &Path,
    out: &mut W,
) -> ReportResult<Summary>
where
    S: TripStore,
    F: FnMut() -> ReportResult<S>,
    W: Write,
{
    let summary = {
        let mut store = connect_with_retry(policy, connect)?;
        compute_summary(&mut store, top_n)?
    };

    persist_and_emit(&summary, output, out)?;
    Ok(summary)
}
