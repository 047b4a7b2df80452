use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use verse_logging::verse_warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// `initial`, `initial * factor`, `initial * factor^2`, ...
    Exponential { initial: Duration, factor: u32 },
}

impl Backoff {
    /// Delay to wait after the given 1-based failed attempt.
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { initial, factor } => {
                let exponent = failed_attempt.saturating_sub(1);
                let multiplier = factor.checked_pow(exponent).unwrap_or(u32::MAX);
                initial.saturating_mul(multiplier)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    pub fn exponential(max_attempts: u32, initial: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential { initial, factor: 2 },
        }
    }

    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..self
        }
    }

    /// Same attempt count, no waiting. Used by tests and dry runs.
    pub fn without_delay(self) -> Self {
        Self {
            backoff: Backoff::Fixed(Duration::ZERO),
            ..self
        }
    }
}

/// Runs `op` until it succeeds, fails with an error `is_retryable` rejects, or
/// `policy.max_attempts` attempts have been made. `op` receives the 1-based
/// attempt number. A policy with zero attempts still runs once.
pub async fn retry<T, E, Op, Fut, P>(
    policy: &RetryPolicy,
    label: &str,
    is_retryable: P,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_attempts || !is_retryable(&err) {
                    return Err(err);
                }
                let delay = policy.backoff.delay_after(attempt);
                verse_warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    label,
                    attempt,
                    max_attempts,
                    err,
                    delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::{retry, Backoff, RetryPolicy};

    #[test]
    fn exponential_backoff_doubles() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_secs(5),
            factor: 2,
        };
        assert_eq!(backoff.delay_after(1), Duration::from_secs(5));
        assert_eq!(backoff.delay_after(2), Duration::from_secs(10));
        assert_eq!(backoff.delay_after(3), Duration::from_secs(20));
    }

    #[test]
    fn fixed_backoff_is_constant() {
        let backoff = Backoff::Fixed(Duration::from_secs(3));
        assert_eq!(backoff.delay_after(1), backoff.delay_after(7));
    }

    #[tokio::test]
    async fn stops_after_max_attempts() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(3, Duration::ZERO);
        let result: Result<(), String> = retry(&policy, "op", |_| true, |_| {
            calls.set(calls.get() + 1);
            async { Err("boom".to_string()) }
        })
        .await;
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn succeeds_on_later_attempt() {
        let policy = RetryPolicy::exponential(5, Duration::from_secs(60)).without_delay();
        let result: Result<u32, String> = retry(&policy, "op", |_| true, |attempt| async move {
            if attempt < 3 {
                Err(format!("attempt {attempt}"))
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_returns_immediately() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(10, Duration::ZERO);
        let result: Result<(), String> = retry(&policy, "op", |e: &String| e != "fatal", |_| {
            calls.set(calls.get() + 1);
            async { Err("fatal".to_string()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(0, Duration::ZERO);
        let _: Result<(), String> = retry(&policy, "op", |_| true, |_| {
            calls.set(calls.get() + 1);
            async { Err("x".to_string()) }
        })
        .await;
        assert_eq!(calls.get(), 1);
    }
}
