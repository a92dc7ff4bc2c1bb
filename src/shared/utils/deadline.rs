//! Bounded waits for store calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::shared::errors::DomainError;

/// Run `fut` with an upper bound of `limit`. An elapsed deadline becomes
/// [`DomainError::Timeout`], which callers treat as retryable.
pub async fn with_deadline<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                limit_ms = limit.as_millis() as u64,
                "Store call exceeded deadline"
            );
            Err(DomainError::Timeout { operation })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_results_within_deadline() {
        let value = with_deadline(Duration::from_millis(100), "quick", async { Ok(7) })
            .await
            .expect("within deadline");
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn elapsed_deadline_is_timeout() {
        let result: Result<(), DomainError> =
            with_deadline(Duration::from_millis(20), "slow_insert", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        match result {
            Err(DomainError::Timeout { operation }) => assert_eq!(operation, "slow_insert"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
