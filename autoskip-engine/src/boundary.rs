//! Failure boundary for timer ticks and event callbacks

use std::future::Future;
use tracing::error;

/// Run `fut` on its own task so a panic inside host code is logged instead of
/// killing the caller's loop. Returns the output, or `None` if the task panicked
/// or was cancelled.
pub(crate) async fn guarded<F, T>(what: &'static str, fut: F) -> Option<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(fut).await {
        Ok(output) => Some(output),
        Err(e) => {
            error!("{} aborted: {}", what, e);
            None
        }
    }
}
