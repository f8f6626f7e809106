//! Exponential-backoff retry around the external generator.
//!
//! Every narrator call goes through this wrapper: transient failures are
//! retried a fixed number of times with doubling delay, the last error is
//! surfaced after exhaustion, and nothing partial is committed for a failed
//! attempt (validation and extraction run at whole-call granularity).

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Retry behavior configuration.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Retries after the initial attempt (0 = single attempt).
    pub max_retries: u32,
    /// Delay before the first retry; doubles each attempt.
    pub base_delay: Duration,
    /// Cap on the computed delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Retrying invoker for generator calls.
#[derive(Debug, Clone, Default)]
pub struct RetryableInvoker {
    config: RetryConfig,
}

impl RetryableInvoker {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let millis = (self.config.base_delay.as_millis() as u64)
            .saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(millis).min(self.config.max_delay)
    }

    /// Invoke an operation, retrying every failure up to the limit.
    pub async fn invoke<T, E, F, Fut>(&self, operation: &str, call: F) -> Result<T, E>
    where
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.invoke_filtered(operation, call, |_| true).await
    }

    /// Invoke an operation, retrying only errors the predicate accepts.
    /// Non-retryable errors (client mistakes, auth failures) surface
    /// immediately.
    pub async fn invoke_filtered<T, E, F, Fut, P>(
        &self,
        operation: &str,
        mut call: F,
        is_retryable: P,
    ) -> Result<T, E>
    where
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match call().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(operation, attempt = attempt + 1, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if !is_retryable(&err) {
                        tracing::warn!(operation, error = %err, "non-retryable failure");
                        return Err(err);
                    }
                    if attempt < self.config.max_retries {
                        let delay = self.delay_for_attempt(attempt);
                        tracing::debug!(
                            operation,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "retrying after failure"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(err);
                }
            }
        }

        let err = last_error.expect("at least one attempt ran");
        tracing::warn!(
            operation,
            attempts = self.config.max_retries + 1,
            error = %err,
            "giving up after all retries"
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_invoker(max_retries: u32) -> RetryableInvoker {
        RetryableInvoker::new(RetryConfig {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        })
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let invoker = fast_invoker(3);
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = invoker
            .invoke("narrate", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let invoker = fast_invoker(3);
        let calls = AtomicU32::new(0);

        let result: Result<&str, String> = invoker
            .invoke("narrate", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok("story")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "story");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_last_error() {
        let invoker = fast_invoker(2);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = invoker
            .invoke("narrate", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(format!("failure {n}")) }
            })
            .await;

        // 1 initial + 2 retries, and the final error is the last one seen.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.unwrap_err(), "failure 2");
    }

    #[tokio::test]
    async fn test_non_retryable_fails_fast() {
        let invoker = fast_invoker(5);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = invoker
            .invoke_filtered(
                "narrate",
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err("bad request".to_string()) }
                },
                |err| !err.contains("bad request"),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let invoker = RetryableInvoker::new(RetryConfig {
            max_retries: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        });

        assert_eq!(invoker.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(invoker.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(invoker.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(invoker.delay_for_attempt(5), Duration::from_secs(1));
    }
}
