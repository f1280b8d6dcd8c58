//! Query debouncing.

use std::time::Duration;

use tokio::sync::watch;
use tracing::trace;

/// Forwards a changing query only once it has stopped changing.
///
/// Each change restarts the quiet period. When the period elapses the latest
/// text is handed to the callback; intermediate values are dropped.
#[derive(Debug, Clone, Copy)]
pub struct QueryDebouncer {
    delay: Duration,
}

impl QueryDebouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Watches `queries` until its sender is dropped, calling `on_settled`
    /// with each settled query.
    ///
    /// The value the channel was created with is not emitted. Anything sent
    /// after that is, including values sent before this future first runs.
    /// A change still pending when the sender goes away is flushed.
    pub async fn run<F>(self, mut queries: watch::Receiver<String>, mut on_settled: F)
    where
        F: FnMut(String),
    {
        while queries.changed().await.is_ok() {
            let closed = loop {
                tokio::select! {
                    changed = queries.changed() => {
                        if changed.is_err() {
                            break true;
                        }
                        trace!("query changed, restarting quiet period");
                    }
                    _ = tokio::time::sleep(self.delay) => break false,
                }
            };

            let query = queries.borrow_and_update().clone();
            on_settled(query);

            if closed {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    fn spawn_debouncer(
        delay: Duration,
    ) -> (
        watch::Sender<String>,
        Arc<Mutex<Vec<String>>>,
        tokio::task::JoinHandle<()>,
    ) {
        let (sender, receiver) = watch::channel(String::new());
        let settled = Arc::new(Mutex::new(Vec::new()));
        let sink = settled.clone();
        let handle = tokio::spawn(
            QueryDebouncer::new(delay).run(receiver, move |query| sink.lock().push(query)),
        );
        (sender, settled, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_settle_once() {
        let (sender, settled, handle) = spawn_debouncer(Duration::from_millis(500));

        for text in ["b", "ba", "bat"] {
            sender.send(text.to_string()).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*settled.lock(), vec!["bat".to_string()]);

        sender.send("batman".to_string()).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*settled.lock(), vec!["bat".to_string(), "batman".to_string()]);

        drop(sender);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_not_emitted() {
        let (sender, settled, handle) = spawn_debouncer(Duration::from_millis(500));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(settled.lock().is_empty());

        drop(sender);
        handle.await.unwrap();
        assert!(settled.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_sent_before_first_poll_is_emitted() {
        let (sender, settled, handle) = spawn_debouncer(Duration::from_millis(500));

        // Sent before the spawned task has had a chance to run
        sender.send_replace("batman".to_string());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*settled.lock(), vec!["batman".to_string()]);

        drop(sender);
        handle.await.unwrap();
        assert_eq!(settled.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_change_flushed_on_close() {
        let (sender, settled, handle) = spawn_debouncer(Duration::from_millis(500));

        sender.send("alien".to_string()).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(sender);
        handle.await.unwrap();

        assert_eq!(*settled.lock(), vec!["alien".to_string()]);
    }
}
