use tokio::task::JoinHandle;

/// Running subscription: the task draining the stream plus a hook that asks
/// it to unsubscribe
pub struct SubscriptionHandle {
    pub task: JoinHandle<()>,
    pub unsub_fn: Box<dyn Fn() + Send>,
}

impl SubscriptionHandle {
    /// Signals the task to unsubscribe and waits for it to finish
    pub async fn shutdown(self) {
        (self.unsub_fn)();
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                log::error!("Subscription task failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_shutdown_signals_task() {
        let (tx, mut rx) = mpsc::channel::<()>(1);
        let task = tokio::spawn(async move {
            rx.recv().await;
        });
        let handle = SubscriptionHandle {
            task,
            unsub_fn: Box::new(move || {
                let _ = tx.try_send(());
            }),
        };

        assert!(!handle.task.is_finished());
        handle.shutdown().await;
    }
}
