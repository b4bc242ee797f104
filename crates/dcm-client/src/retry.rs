//! 重試策略

use dcm_core::RetrySettings;
use std::time::Duration;

use crate::ApiResult;

/// 等待實作（測試時可替換為不等待）
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// 以執行緒休眠等待
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// 重試策略：最多嘗試次數與退避間隔
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_factor: f64,
    max_delay: Duration,
}

impl RetryPolicy {
    /// 從配置建立
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            backoff_factor: settings.backoff_factor.max(1.0),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }

    /// 只嘗試一次
    pub fn no_retry() -> Self {
        Self::from_settings(&RetrySettings::immediate(1))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 第 `retry` 次重試前的等待（從 1 起算）
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);

        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// 執行操作，可重試的錯誤在嘗試次數內重試
    pub fn run<T, F, S>(&self, operation: &str, sleeper: &S, mut op: F) -> ApiResult<T>
    where
        F: FnMut() -> ApiResult<T>,
        S: Sleeper + ?Sized,
    {
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!("{} 在第 {} 次嘗試成功", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(error) if error.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} 失敗（第 {}/{} 次）: {}，{:?} 後重試",
                        operation,
                        attempt,
                        self.max_attempts,
                        error,
                        delay
                    );
                    sleeper.sleep(delay);
                    attempt += 1;
                }
                Err(error) => {
                    tracing::error!("{} 失敗，不再重試: {}", operation, error);
                    return Err(error);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingSleeper {
        delays: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.delays.borrow_mut().push(duration);
        }
    }

    #[test]
    fn test_default_is_fixed_30s() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(30));
        assert_eq!(policy.delay_for(2), Duration::from_secs(30));
    }

    #[test]
    fn test_exponential_backoff_capped() {
        let policy = RetryPolicy::from_settings(
            &RetrySettings::default()
                .with_max_attempts(6)
                .with_backoff(1_000, 2.0, 5_000),
        );

        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(5));
        assert_eq!(policy.delay_for(60), Duration::from_secs(5));
    }

    #[test]
    fn test_retries_until_success() {
        let policy = RetryPolicy::default();
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let result = policy.run("fetch", &sleeper, || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(ApiError::Network("connection reset".to_string()))
            } else {
                Ok(42)
            }
        });

        assert_eq!(result, Ok(42));
        assert_eq!(calls.get(), 3);
        assert_eq!(sleeper.delays.borrow().len(), 2);
    }

    #[test]
    fn test_stops_after_max_attempts() {
        let policy = RetryPolicy::from_settings(&RetrySettings::immediate(3));
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let result: ApiResult<()> = policy.run("fetch", &sleeper, || {
            calls.set(calls.get() + 1);
            Err(ApiError::Status {
                status: 502,
                message: "bad gateway".to_string(),
            })
        });

        assert!(matches!(result, Err(ApiError::Status { status: 502, .. })));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_non_retryable_not_retried() {
        let policy = RetryPolicy::default();
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let result: ApiResult<()> = policy.run("save", &sleeper, || {
            calls.set(calls.get() + 1);
            Err(ApiError::Unauthorized)
        });

        assert_eq!(result, Err(ApiError::Unauthorized));
        assert_eq!(calls.get(), 1);
        assert!(sleeper.delays.borrow().is_empty());
    }
}
