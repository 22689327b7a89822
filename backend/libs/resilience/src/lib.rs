/// Resilience helpers for calls that cross a process boundary
///
/// Every external call in the Around services (object storage, the
/// prediction endpoint, the search engine) runs through a [`Deadline`].
/// The default deadline is unbounded, so wrapping a call never changes its
/// behaviour until an operator configures a limit.
///
/// # Example: bounded search-engine call
///
/// ```rust,no_run
/// use resilience::Deadline;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let deadline = Deadline::after(Duration::from_secs(5));
///
///     let result = deadline
///         .run(async {
///             // Your search-engine request
///             Ok::<_, String>(())
///         })
///         .await;
/// }
/// ```

pub mod timeout;

pub use timeout::{Deadline, TimeoutError};
