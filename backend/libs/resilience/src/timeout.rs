/// Optional deadline wrapper for async operations
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound on how long an external call may run.
///
/// `Deadline::default()` is unbounded: the wrapped future is awaited to
/// completion exactly as if it had not been wrapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Duration>);

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    #[error("Operation timed out after {0:?}")]
    Elapsed(Duration),
}

impl Deadline {
    pub const fn unbounded() -> Self {
        Self(None)
    }

    pub const fn after(duration: Duration) -> Self {
        Self(Some(duration))
    }

    /// Build from an optional millisecond setting; `None` or `0` is unbounded.
    pub fn from_millis(millis: Option<u64>) -> Self {
        match millis {
            Some(0) | None => Self::unbounded(),
            Some(ms) => Self::after(Duration::from_millis(ms)),
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.0
    }

    pub fn is_bounded(&self) -> bool {
        self.0.is_some()
    }

    /// Await `future`, giving up once the deadline elapses.
    pub async fn run<F, T>(self, future: F) -> Result<T, TimeoutError>
    where
        F: Future<Output = T>,
    {
        match self.0 {
            None => Ok(future.await),
            Some(duration) => timeout(duration, future).await.map_err(|_| {
                tracing::warn!(timeout_ms = duration.as_millis() as u64, "external call exceeded deadline");
                TimeoutError::Elapsed(duration)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unbounded_awaits_to_completion() {
        let result = Deadline::unbounded()
            .run(async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                42
            })
            .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_bounded_success() {
        let result = Deadline::after(Duration::from_secs(1)).run(async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_elapsed() {
        let result = Deadline::after(Duration::from_millis(10))
            .run(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                42
            })
            .await;

        assert!(matches!(result, Err(TimeoutError::Elapsed(_))));
    }

    #[tokio::test]
    async fn test_inner_result_is_passed_through() {
        let result = Deadline::after(Duration::from_secs(1))
            .run(async { Err::<i32, _>("operation failed") })
            .await;

        assert_eq!(result.unwrap(), Err("operation failed"));
    }

    #[test]
    fn test_from_millis() {
        assert_eq!(Deadline::from_millis(None), Deadline::unbounded());
        assert_eq!(Deadline::from_millis(Some(0)), Deadline::unbounded());
        assert_eq!(
            Deadline::from_millis(Some(250)).duration(),
            Some(Duration::from_millis(250))
        );
        assert!(!Deadline::default().is_bounded());
    }
}
