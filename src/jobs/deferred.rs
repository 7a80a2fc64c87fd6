use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Work that runs once after a delay on its own task.
///
/// Dropping the handle detaches the task; it still runs.
pub struct DeferredTask<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> DeferredTask<T> {
    pub fn schedule<F, Fut>(delay: Duration, work: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work().await
        });
        Self { handle }
    }

    /// Stop the task. Has no effect once the work has started running to completion.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the outcome; `None` if the task was cancelled or panicked.
    pub async fn wait(self) -> Option<T> {
        self.handle.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn runs_after_delay() {
        let task = DeferredTask::schedule(Duration::from_millis(20), || async { 42 });
        assert!(!task.is_finished());
        assert_eq!(task.wait().await, Some(42));
    }

    #[tokio::test]
    async fn cancelled_task_never_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let task = DeferredTask::schedule(Duration::from_secs(30), move || async move {
            flag.store(true, Ordering::SeqCst);
        });
        task.cancel();
        assert_eq!(task.wait().await, None);
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dropped_handle_still_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        drop(DeferredTask::schedule(Duration::from_millis(5), move || async move {
            flag.store(true, Ordering::SeqCst);
        }));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(ran.load(Ordering::SeqCst));
    }
}
