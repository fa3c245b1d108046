//! Change notification fan-out
//!
//! ```text
//! ReservationManager ─┐                       ┌─▶ broadcast (SSE / in-process)
//! OrdersManager ──────┼─ publish (try_send) ─▶ mpsc ─▶ NotifierWorker
//! admin handlers ─────┘       bounded                 └─▶ NotificationSink × N (timeout)
//! ```
//!
//! 发布方只做非阻塞 `try_send`，投递失败不影响已提交的业务操作。

mod notifier;
mod sink;

pub use notifier::{ChangeNotifier, NotifierWorker};
pub use sink::{LogSink, NotificationSink, SinkError, WebhookSink};
