use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Inter-attempt delay, in whole seconds. A range is sampled uniformly per
/// attempt so parallel runs don't hammer an endpoint in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayRange {
    Fixed(u64),
    Uniform(u64, u64),
}

impl DelayRange {
    pub fn sample(&self) -> u64 {
        match *self {
            DelayRange::Fixed(secs) => secs,
            DelayRange::Uniform(min, max) => rand::thread_rng().gen_range(min..=max),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: DelayRange,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: DelayRange) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

fn truncate_message(message: &str, limit: usize) -> String {
    if message.chars().count() > limit {
        let cut: String = message.chars().take(limit.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        message.to_owned()
    }
}

/// Runs `action` up to `policy.max_attempts` times, sleeping a sampled delay
/// between failed attempts (never after the last). The final error is
/// returned unchanged.
///
/// Every error kind is retried until exhaustion, including permanent ones;
/// callers that want to fail fast use a smaller attempt count.
pub async fn run_with_retry<T, E, F, Fut>(
    mut action: F,
    label: &str,
    policy: RetryPolicy,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        match action().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt < policy.max_attempts {
                    let delay_secs = policy.delay.sample();
                    log::warn!(
                        "Attempt {}/{} failed for {}: {}. Retrying in {}s",
                        attempt,
                        policy.max_attempts,
                        label,
                        truncate_message(&error.to_string(), 120),
                        delay_secs,
                    );
                    last_error = Some(error);
                    tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                } else {
                    log::error!(
                        "All {} attempts failed for {}: {}",
                        policy.max_attempts,
                        label,
                        truncate_message(&error.to_string(), 120),
                    );
                    last_error = Some(error);
                }
            }
        }
    }

    // max_attempts is at least 1, so by now at least one attempt has run.
    Err(last_error.expect("retry loop should record an error before exhausting"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn returns_success_value_after_transient_failures() {
        let calls = Cell::new(0u32);
        let started = tokio::time::Instant::now();

        let result = run_with_retry(
            || {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move {
                    if attempt <= 2 {
                        Err(format!("transient failure {}", attempt))
                    } else {
                        Ok(42)
                    }
                }
            },
            "transient action",
            RetryPolicy::new(3, DelayRange::Fixed(1)),
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.get(), 3);
        // Exactly two inter-attempt delays of 1s each on the paused clock.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn reraises_final_error_after_exhaustion() {
        let calls = Cell::new(0u32);

        let result: Result<(), String> = run_with_retry(
            || {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move { Err(format!("failure on attempt {}", attempt)) }
            },
            "doomed action",
            RetryPolicy::new(3, DelayRange::Uniform(1, 2)),
        )
        .await;

        assert_eq!(calls.get(), 3);
        assert_eq!(result, Err("failure on attempt 3".to_owned()));
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_sleep_after_the_last_attempt() {
        let started = tokio::time::Instant::now();

        let result: Result<(), String> = run_with_retry(
            || async { Err("always".to_owned()) },
            "doomed action",
            RetryPolicy::new(2, DelayRange::Fixed(5)),
        )
        .await;

        assert!(result.is_err());
        // One inter-attempt delay only; no trailing sleep.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(6));
    }

    #[tokio::test]
    async fn single_attempt_returns_immediately() {
        let result = run_with_retry(
            || async { Ok::<_, String>("done") },
            "single shot",
            RetryPolicy::new(1, DelayRange::Fixed(30)),
        )
        .await;

        assert_eq!(result, Ok("done"));
    }

    #[test]
    fn uniform_delay_stays_within_bounds() {
        let range = DelayRange::Uniform(1, 2);
        for _ in 0..50 {
            let sampled = range.sample();
            assert!((1..=2).contains(&sampled));
        }
    }
}
