use parking_lot::Mutex;
use shared::message::ChangeEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::calendar::ResourceCalendar;
use crate::catalog::InMemoryCatalog;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result, StorageBackend};
use crate::notify::{ChangeNotifier, LogSink, NotificationSink, WebhookSink};
use crate::orders::OrdersManager;
use crate::reservations::{ConfirmationPolicy, ReservationManager};
use crate::reviews::ReviewService;
use crate::storage::{BookingStore, MemoryStore, RedbStore};

/// Interval of the notifier statistics task
const NOTIFY_STATS_INTERVAL: Duration = Duration::from_secs(60);

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | catalog | Arc<InMemoryCatalog> | 餐厅 / 桌台 / 时段 / 菜品 |
/// | store | Arc<dyn BookingStore> | 预订、订单、评价持久化 |
/// | calendar | Arc<ResourceCalendar> | 桌台时段占用表 |
/// | reservations | Arc<ReservationManager> | 预订状态机 |
/// | orders | Arc<OrdersManager> | 订单状态机 |
/// | reviews | Arc<ReviewService> | 评价 |
/// | notifier | ChangeNotifier | 变更通知发布端 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub catalog: Arc<InMemoryCatalog>,
    pub store: Arc<dyn BookingStore>,
    pub calendar: Arc<ResourceCalendar>,
    pub reservations: Arc<ReservationManager>,
    pub orders: Arc<OrdersManager>,
    pub reviews: Arc<ReviewService>,
    pub notifier: ChangeNotifier,
    /// 通知队列接收端，`start_background_tasks` 时交给 NotifierWorker
    notify_rx: Arc<Mutex<Option<mpsc::Receiver<ChangeEvent>>>>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("reservations", &self.reservations)
            .field("orders", &self.orders)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 由已构造的目录与存储组装服务 (不做 IO)
    pub fn new(config: Config, catalog: Arc<InMemoryCatalog>, store: Arc<dyn BookingStore>) -> Self {
        let (notifier, notify_rx) = ChangeNotifier::new(config.notify_queue_capacity);
        let calendar = Arc::new(ResourceCalendar::new());
        let policy = if config.reservation_auto_confirm {
            ConfirmationPolicy::AutoConfirm
        } else {
            ConfirmationPolicy::RequireStaff
        };

        let reservations = Arc::new(ReservationManager::new(
            calendar.clone(),
            catalog.clone(),
            store.clone(),
            notifier.clone(),
            policy,
        ));
        let orders = Arc::new(OrdersManager::new(
            catalog.clone(),
            store.clone(),
            notifier.clone(),
        ));
        let reviews = Arc::new(ReviewService::new(
            catalog.clone(),
            store.clone(),
            notifier.clone(),
        ));

        Self {
            config,
            catalog,
            store,
            calendar,
            reservations,
            orders,
            reviews,
            notifier,
            notify_rx: Arc::new(Mutex::new(Some(notify_rx))),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 存储 (redb: work_dir/database/dine.redb，或内存)
    /// 2. 目录 (CATALOG_SEED，未配置时为空)
    /// 3. 组装服务
    /// 4. 从持久化的 Pending / Confirmed 预订恢复占用表
    pub fn initialize(config: &Config) -> Result<Self> {
        let store: Arc<dyn BookingStore> = match config.storage_backend {
            StorageBackend::Redb => {
                let path = config.database_path();
                tracing::info!(path = %path.display(), "Opening redb storage");
                Arc::new(RedbStore::open(&path)?)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let catalog = match &config.catalog_seed {
            Some(path) => InMemoryCatalog::from_seed_file(path)?,
            None => {
                tracing::warn!("CATALOG_SEED not set, starting with an empty catalog");
                InMemoryCatalog::new()
            }
        };

        let state = Self::new(config.clone(), Arc::new(catalog), store);
        state.reservations.recover()?;
        Ok(state)
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 接收请求之前调用；只有第一次调用会启动通知分发。
    ///
    /// 启动的任务：
    /// - 通知分发 (NotifierWorker)
    /// - 通知统计 (丢弃计数)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let Some(notify_rx) = self.notify_rx.lock().take() else {
            tracing::warn!("Background tasks already started");
            return tasks;
        };

        let mut sinks: Vec<Arc<dyn NotificationSink>> = vec![Arc::new(LogSink)];
        for url in &self.config.webhook_urls {
            sinks.push(Arc::new(WebhookSink::new(url.clone())));
        }
        let worker = self.notifier.worker(sinks, self.config.notify_sink_timeout());
        let token = tasks.shutdown_token();
        tasks.spawn("notifier", TaskKind::Worker, worker.run(notify_rx, token));

        let notifier = self.notifier.clone();
        let token = tasks.shutdown_token();
        tasks.spawn("notify_stats", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(NOTIFY_STATS_INTERVAL);
            let mut last_dropped = 0;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let dropped = notifier.dropped_count();
                        if dropped > last_dropped {
                            tracing::warn!(
                                dropped_total = dropped,
                                dropped_since_last = dropped - last_dropped,
                                "Change events dropped by the notifier"
                            );
                            last_dropped = dropped;
                        }
                    }
                }
            }
        });

        tasks.log_summary();
        tasks
    }
}
