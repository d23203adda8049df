//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::SocratesError;

/// Wrap a gateway future with a finite deadline.
///
/// On expiry the future is dropped and `SocratesError::Timeout` is returned.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, SocratesError>>,
) -> Result<T, SocratesError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(SocratesError::Timeout(duration.as_millis() as u64)),
    }
}
