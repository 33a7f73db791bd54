//! Wall-clock limits for extraction jobs.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pivotstream_core::{ExtractError, Result};

/// Run `job` on a worker thread and wait at most `timeout` for it.
///
/// On timeout the worker is detached, not cancelled: it runs to
/// completion in the background and its result is discarded. A job that
/// panics is reported as [`ExtractError::InvalidFile`].
pub fn run_with_deadline<T, F>(timeout: Duration, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("pivotstream-extract".into())
        .spawn(move || {
            // The receiver is gone once the deadline has passed.
            let _ = tx.send(job());
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            log::debug!("extraction exceeded {timeout:?}, abandoning worker");
            Err(ExtractError::Timeout(timeout))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(ExtractError::InvalidFile(
            "extraction worker stopped without a result".into(),
        )),
    }
}
