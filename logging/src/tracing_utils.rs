use std::future::Future;

use tokio::task::JoinHandle;
use tracing::Instrument;

/// Spawn a task that keeps logging under the caller's span
pub fn spawn_in_current_span<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(future.in_current_span())
}
