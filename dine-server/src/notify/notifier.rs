//! ChangeNotifier + NotifierWorker

use super::sink::NotificationSink;
use futures::future::join_all;
use shared::message::ChangeEvent;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Capacity of the in-process subscriber channel
const SUBSCRIBER_CAPACITY: usize = 256;

/// Publisher handle (cheap to clone)
#[derive(Clone, Debug)]
pub struct ChangeNotifier {
    queue_tx: mpsc::Sender<ChangeEvent>,
    subscriber_tx: broadcast::Sender<ChangeEvent>,
    dropped: Arc<AtomicU64>,
}

impl ChangeNotifier {
    /// Create the notifier and the queue receiver for its [`NotifierWorker`]
    pub fn new(queue_capacity: usize) -> (Self, mpsc::Receiver<ChangeEvent>) {
        let (queue_tx, queue_rx) = mpsc::channel(queue_capacity.max(1));
        let (subscriber_tx, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        (
            Self {
                queue_tx,
                subscriber_tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            queue_rx,
        )
    }

    /// Fire-and-forget publish
    ///
    /// Call only after the state change is committed. Never blocks and never
    /// fails the caller: a full or closed queue drops the event.
    pub fn publish(&self, event: ChangeEvent) {
        match self.queue_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    event_type = %event.event_type,
                    resource_id = %event.resource_id,
                    dropped,
                    "Notification queue full, event dropped"
                );
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    event_type = %event.event_type,
                    "Notification worker stopped, event dropped"
                );
            }
        }
    }

    /// Subscribe to dispatched events
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.subscriber_tx.subscribe()
    }

    /// Events dropped because the queue was full or closed
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Build the dispatch worker sharing this notifier's subscriber channel
    pub fn worker(
        &self,
        sinks: Vec<Arc<dyn NotificationSink>>,
        sink_timeout: Duration,
    ) -> NotifierWorker {
        NotifierWorker {
            subscriber_tx: self.subscriber_tx.clone(),
            sinks,
            sink_timeout,
        }
    }
}

/// 通知分发工作者
///
/// 从有界队列取事件，先广播给进程内订阅者，再并发投递到各 sink。
/// 单个 sink 超时或失败只记录日志。
pub struct NotifierWorker {
    subscriber_tx: broadcast::Sender<ChangeEvent>,
    sinks: Vec<Arc<dyn NotificationSink>>,
    sink_timeout: Duration,
}

impl NotifierWorker {
    /// 运行工作者（阻塞直到通道关闭或收到 shutdown）
    pub async fn run(self, mut queue_rx: mpsc::Receiver<ChangeEvent>, shutdown: CancellationToken) {
        tracing::info!(sinks = self.sinks.len(), "Notifier worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Notifier worker received shutdown signal");
                    break;
                }
                event = queue_rx.recv() => {
                    let Some(event) = event else {
                        tracing::info!("Notification queue closed, notifier worker stopping");
                        break;
                    };
                    self.dispatch(event).await;
                }
            }
        }
    }

    async fn dispatch(&self, event: ChangeEvent) {
        // Err only means no subscribers right now
        let _ = self.subscriber_tx.send(event.clone());

        if self.sinks.is_empty() {
            return;
        }

        let deliveries = self.sinks.iter().map(|sink| {
            let event = &event;
            async move {
                match tokio::time::timeout(self.sink_timeout, sink.deliver(event)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::warn!(
                            sink = sink.name(),
                            event_type = %event.event_type,
                            error = %e,
                            "Notification delivery failed"
                        );
                    }
                    Err(_) => {
                        tracing::warn!(
                            sink = sink.name(),
                            event_type = %event.event_type,
                            timeout_ms = self.sink_timeout.as_millis() as u64,
                            "Notification delivery timed out"
                        );
                    }
                }
            }
        });
        join_all(deliveries).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SinkError;
    use async_trait::async_trait;
    use shared::message::ChangeEventType;
    use tokio::sync::Mutex;

    fn event(resource_id: &str) -> ChangeEvent {
        ChangeEvent::new(ChangeEventType::OrderCreated, 1, resource_id, &())
    }

    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, event: &ChangeEvent) -> Result<(), SinkError> {
            self.seen.lock().await.push(event.resource_id.clone());
            Ok(())
        }
    }

    struct StuckSink;

    #[async_trait]
    impl NotificationSink for StuckSink {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn deliver(&self, _event: &ChangeEvent) -> Result<(), SinkError> {
            futures::future::pending::<()>().await;
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        async fn deliver(&self, _event: &ChangeEvent) -> Result<(), SinkError> {
            Err(SinkError::Rejected(503))
        }
    }

    #[test]
    fn test_publish_on_full_queue_drops_without_error() {
        let (notifier, _rx) = ChangeNotifier::new(2);
        for i in 0..5 {
            notifier.publish(event(&format!("o-{i}")));
        }
        assert_eq!(notifier.dropped_count(), 3);
    }

    #[test]
    fn test_publish_after_worker_gone_is_silent() {
        let (notifier, rx) = ChangeNotifier::new(4);
        drop(rx);
        notifier.publish(event("o-1"));
        assert_eq!(notifier.dropped_count(), 1);
    }

    #[tokio::test]
    async fn test_worker_fans_out_to_subscribers_and_sinks() {
        let (notifier, rx) = ChangeNotifier::new(16);
        let recording = Arc::new(RecordingSink {
            seen: Mutex::new(Vec::new()),
        });
        let sinks: Vec<Arc<dyn NotificationSink>> = vec![recording.clone(), Arc::new(FailingSink)];
        let worker = notifier.worker(sinks, Duration::from_millis(200));
        let mut subscriber = notifier.subscribe();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(worker.run(rx, shutdown.clone()));

        notifier.publish(event("o-1"));
        notifier.publish(event("o-2"));

        let first = subscriber.recv().await.unwrap();
        let second = subscriber.recv().await.unwrap();
        assert_eq!(first.resource_id, "o-1");
        assert_eq!(second.resource_id, "o-2");

        shutdown.cancel();
        handle.await.unwrap();
        assert_eq!(*recording.seen.lock().await, vec!["o-1", "o-2"]);
    }

    #[tokio::test]
    async fn test_stuck_sink_does_not_stall_dispatch() {
        let (notifier, rx) = ChangeNotifier::new(16);
        let sinks: Vec<Arc<dyn NotificationSink>> = vec![Arc::new(StuckSink)];
        let worker = notifier.worker(sinks, Duration::from_millis(20));
        let mut subscriber = notifier.subscribe();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(worker.run(rx, shutdown.clone()));

        for i in 0..3 {
            notifier.publish(event(&format!("o-{i}")));
        }
        for i in 0..3 {
            let received = tokio::time::timeout(Duration::from_secs(2), subscriber.recv())
                .await
                .expect("dispatch stalled")
                .unwrap();
            assert_eq!(received.resource_id, format!("o-{i}"));
        }

        shutdown.cancel();
        handle.await.unwrap();
    }
}
