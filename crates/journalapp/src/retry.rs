use std::time::Duration;

use crate::error::Result;

/// Bounded retry for reads against an eventually-consistent store.
///
/// A blob written by one request may not be visible to the next one yet, so
/// reads expected to succeed get a fixed number of attempts with a fixed
/// delay in between. Only [`crate::error::JournalError::BlobNotFound`] is
/// retried; every other error aborts immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn run<T>(&self, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 1;
        loop {
            match op() {
                Err(err) if err.is_not_found() && attempt < self.max_attempts => {
                    tracing::debug!(attempt, "blob not visible yet, retrying");
                    std::thread::sleep(self.delay);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;

    #[test]
    fn test_succeeds_after_transient_not_found() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let mut calls = 0;
        let result = policy.run(|| {
            calls += 1;
            if calls < 3 {
                Err(JournalError::not_found("ns", "a.pdf"))
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let mut calls = 0;
        let result: Result<()> = policy.run(|| {
            calls += 1;
            Err(JournalError::not_found("ns", "a.pdf"))
        });
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let mut calls = 0;
        let result: Result<()> = policy.run(|| {
            calls += 1;
            Err(JournalError::Store("backend down".to_string()))
        });
        assert!(matches!(result, Err(JournalError::Store(_))));
        assert_eq!(calls, 1);
    }
}
