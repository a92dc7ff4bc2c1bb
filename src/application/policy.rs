//! How application services talk to the store: every call is bounded by a
//! deadline, and reads are retried on transient failures.

use std::future::Future;
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};
use crate::shared::utils::{retry_with_backoff, with_deadline, RetryConfig};

#[derive(Debug, Clone)]
pub struct StorePolicy {
    /// Upper bound for a single store call
    pub timeout: Duration,
    /// Backoff for read-only calls
    pub read_retry: RetryConfig,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            read_retry: RetryConfig::default(),
        }
    }
}

impl StorePolicy {
    /// Read-only call: deadline per attempt, retried while the error is transient.
    pub async fn read<T, F, Fut>(&self, operation: &'static str, mut call: F) -> DomainResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        let timeout = self.timeout;
        retry_with_backoff(
            &self.read_retry,
            || with_deadline(timeout, operation, call()),
            DomainError::is_transient,
            operation,
        )
        .await
    }

    /// Mutation: a single attempt under the deadline. A timed-out write may
    /// still have landed, so retrying is left to the caller.
    pub async fn write<T, Fut>(&self, operation: &'static str, call: Fut) -> DomainResult<T>
    where
        Fut: Future<Output = DomainResult<T>>,
    {
        with_deadline(self.timeout, operation, call).await
    }
}
