/// Integration tests for resilience library
use resilience::{Deadline, TimeoutError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, PartialEq)]
enum CallError {
    Remote(&'static str),
    Timeout,
}

impl From<TimeoutError> for CallError {
    fn from(_: TimeoutError) -> Self {
        CallError::Timeout
    }
}

async fn remote_call(delay: Duration, outcome: Result<u32, &'static str>) -> Result<u32, CallError> {
    tokio::time::sleep(delay).await;
    outcome.map_err(CallError::Remote)
}

async fn guarded(deadline: Deadline, delay: Duration, outcome: Result<u32, &'static str>) -> Result<u32, CallError> {
    deadline.run(remote_call(delay, outcome)).await?
}

#[tokio::test(start_paused = true)]
async fn test_inner_error_passes_through() {
    let result = guarded(
        Deadline::after(Duration::from_secs(1)),
        Duration::from_millis(10),
        Err("bucket missing"),
    )
    .await;

    assert_eq!(result, Err(CallError::Remote("bucket missing")));
}

#[tokio::test(start_paused = true)]
async fn test_elapsed_deadline_maps_to_caller_error() {
    let result = guarded(
        Deadline::after(Duration::from_millis(100)),
        Duration::from_secs(30),
        Ok(1),
    )
    .await;

    assert_eq!(result, Err(CallError::Timeout));
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_waits_for_slow_call() {
    let result = guarded(Deadline::default(), Duration::from_secs(3600), Ok(7)).await;
    assert_eq!(result, Ok(7));
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_future_is_dropped() {
    let completed = Arc::new(AtomicU32::new(0));
    let flag = completed.clone();

    let result = Deadline::after(Duration::from_millis(50))
        .run(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            flag.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    assert!(result.is_err());
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(completed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_from_millis_settings() {
    assert_eq!(Deadline::from_millis(None), Deadline::unbounded());
    assert_eq!(Deadline::from_millis(Some(0)), Deadline::unbounded());
    assert_eq!(
        Deadline::from_millis(Some(250)).duration(),
        Some(Duration::from_millis(250))
    );
}
