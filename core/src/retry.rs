//! Bounded, fixed-delay retry for opening the store connection.
//!
//! Every failure is treated the same: log, sleep, try again.
//! No backoff growth, no jitter.

use std::thread;
use std::time::Duration;

use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay: Duration::from_secs(2),
        }
    }
}

/// Call `connect` until it succeeds or `policy.max_attempts` calls have failed.
///
/// A policy of zero attempts still makes one call.
pub fn connect_with_retry<T, F>(policy: &RetryPolicy, mut connect: F) -> ReportResult<T>
where
    F: FnMut() -> ReportResult<T>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        match connect() {
            Ok(conn) => {
                if attempt > 1 {
                    log::info!("database reachable after {attempt} attempts");
                }
                return Ok(conn);
            }
            Err(e) => {
                log::warn!("database not ready (attempt {attempt}/{max_attempts}): {e}");
                last_error = e.to_string();
                if attempt < max_attempts && !policy.delay.is_zero() {
                    thread::sleep(policy.delay);
                }
            }
        }
    }

    log::error!("giving up: database unreachable after {max_attempts} attempts");
    Err(ReportError::ConnectRetriesExhausted {
        attempts: max_attempts,
        last_error,
    })
}
