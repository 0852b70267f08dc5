use std::time::Duration;

use tokio::{sync::Mutex, task::AbortHandle};

/// A slot holding at most one delayed task that can be cancelled before it fires.
///
/// Scheduling a new task aborts the one already waiting in the slot.
pub(crate) struct DeferredTask {
    pending: Mutex<Option<AbortHandle>>,
}

impl DeferredTask {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Runs `task` after `delay` on the tokio runtime.
    pub async fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        if let Some(previous) = self.pending.lock().await.replace(handle.abort_handle()) {
            previous.abort();
        }
    }

    /// Cancels the waiting task. Returns whether one was still pending.
    pub async fn cancel(&self) -> bool {
        match self.pending.lock().await.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            Some(_) | None => false,
        }
    }

    pub async fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
