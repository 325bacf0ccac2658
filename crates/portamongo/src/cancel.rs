//! Cancellation support for in-flight network calls.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Runs `future` until it completes or `token` is cancelled.
///
/// On cancellation the future is dropped, aborting whatever call it was
/// waiting on, and `on_cancel` builds the error returned to the caller.
pub(crate) async fn run_cancellable<T, E, F>(
    token: &CancellationToken,
    future: F,
    on_cancel: impl FnOnce() -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(on_cancel()),
        result = future => result,
    }
}
