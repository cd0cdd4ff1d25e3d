//! Retry-with-backoff wrapper for the batch writer.

use std::thread;
use std::time::Duration;

use tracing::warn;

use epinflow_core::error::EpinResult;

/// Run `op` up to `max_attempts` times with linear backoff
/// (attempt-count seconds) between attempts.
///
/// Only transient errors are retried; parse and validation failures
/// surface immediately.
pub fn with_retry<T>(
    max_attempts: u32,
    mut op: impl FnMut(u32) -> EpinResult<T>,
) -> EpinResult<T> {
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                warn!(attempt, error = %err, "transient failure, backing off");
                thread::sleep(backoff(attempt));
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use epinflow_core::error::EpinError;

    #[test]
    fn test_succeeds_first_try() {
        let mut calls = 0;
        let result = with_retry(3, |_| {
            calls += 1;
            Ok(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_retries_transient_until_success() {
        let mut calls = 0;
        let result = with_retry(3, |attempt| {
            calls += 1;
            if attempt < 3 {
                Err(EpinError::store_transient("connection reset"))
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: EpinResult<()> = with_retry(2, |_| {
            calls += 1;
            Err(EpinError::store_transient("connection reset"))
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_permanent_errors_never_retry() {
        let mut calls = 0;
        let result: EpinResult<()> = with_retry(3, |_| {
            calls += 1;
            Err(EpinError::store("constraint violated"))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
