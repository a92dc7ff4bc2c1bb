pub mod deadline;
pub mod retry;

pub use deadline::with_deadline;
pub use retry::{retry_with_backoff, RetryConfig};
