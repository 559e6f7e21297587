use crate::error::EvidenceResult;
use crate::types::config::CollectionSettings;
use std::thread;
use tracing::debug;

/// Run `operation`, retrying transient failures with exponential backoff.
///
/// Non-retryable errors are returned immediately; after `max_retries`
/// retries the last error is returned.
pub fn with_retries<T, F>(settings: &CollectionSettings, label: &str, mut operation: F) -> EvidenceResult<T>
where
    F: FnMut() -> EvidenceResult<T>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < settings.max_retries => {
                attempt += 1;
                let delay = settings.delay_for_attempt(attempt);
                debug!(
                    call = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying collaborator call"
                );
                thread::sleep(delay);
            }
            Err(err) => return Err(err),
        }
    }
}
