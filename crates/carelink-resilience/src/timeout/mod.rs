//! Timeout wrappers for async operations.

use carelink_core::CarelinkError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Wraps an async operation with a timeout.
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> Result<T, CarelinkError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, CarelinkError>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| CarelinkError::Timeout(format!("Operation timed out after {:?}", duration)))?
}

/// Races an operation against both a deadline and a cancellation token.
///
/// Cancellation wins ties so a shutting-down process stops waiting at once.
pub async fn with_deadline<Fut, T>(
    duration: Duration,
    cancel: &CancellationToken,
    operation: Fut,
) -> Result<T, CarelinkError>
where
    Fut: Future<Output = Result<T, CarelinkError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(CarelinkError::Cancelled(
            "Operation abandoned on shutdown".to_string(),
        )),
        result = tokio::time::timeout(duration, operation) => result.map_err(|_| {
            CarelinkError::Timeout(format!("Operation timed out after {:?}", duration))
        })?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_success() {
        let result =
            with_timeout(Duration::from_secs(1), || async { Ok::<_, CarelinkError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_exceeded() {
        let result = with_timeout(Duration::from_millis(10), || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, CarelinkError>(42)
        })
        .await;

        assert!(matches!(result, Err(CarelinkError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_deadline_passes_through_inner_error() {
        let cancel = CancellationToken::new();
        let result: Result<i32, _> = with_deadline(Duration::from_secs(1), &cancel, async {
            Err(CarelinkError::Cache("connection refused".to_string()))
        })
        .await;

        assert!(matches!(result, Err(CarelinkError::Cache(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_times_out_on_hanging_operation() {
        let cancel = CancellationToken::new();
        let started = tokio::time::Instant::now();

        let result: Result<i32, _> = with_deadline(
            Duration::from_millis(500),
            &cancel,
            std::future::pending::<Result<i32, CarelinkError>>(),
        )
        .await;

        assert!(matches!(result, Err(CarelinkError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_deadline_honours_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<i32, _> = with_deadline(
            Duration::from_secs(60),
            &cancel,
            std::future::pending::<Result<i32, CarelinkError>>(),
        )
        .await;

        assert!(matches!(result, Err(CarelinkError::Cancelled(_))));
    }
}
