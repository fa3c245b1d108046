//! Dine Server - 餐厅预订与点单一致性核心
//!
//! # 架构概述
//!
//! - **占用表** (`calendar`): 桌台 × 时段 × 日期 的原子分配
//! - **预订** (`reservations`): 预订状态机，创建即占用，取消 / 完成即释放
//! - **订单** (`orders`): 订单状态机 + 明细账，金额始终由明细重算
//! - **通知** (`notify`): 提交后异步推送变更事件
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! dine-server/src/
//! ├── core/          # 配置、状态、后台任务、服务器
//! ├── auth/          # 调用方身份、角色检查
//! ├── api/           # HTTP 路由和处理器
//! ├── calendar/      # ResourceCalendar
//! ├── reservations/  # ReservationManager
//! ├── orders/        # OrdersManager + ledger
//! ├── catalog/       # 餐厅 / 桌台 / 时段 / 菜品
//! ├── storage/       # BookingStore (redb / 内存)
//! ├── notify/        # ChangeNotifier + sinks
//! └── utils/         # 日志、按 key 加锁
//! ```

pub mod api;
pub mod auth;
pub mod calendar;
pub mod catalog;
pub mod core;
pub mod notify;
pub mod orders;
pub mod reservations;
pub mod reviews;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentActor;
pub use calendar::{Allocation, ResourceCalendar, SlotKey};
pub use core::{Config, Server, ServerState};
pub use notify::ChangeNotifier;
pub use orders::OrdersManager;
pub use reservations::ReservationManager;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境
///
/// 1. 加载 `.env`
/// 2. 确保工作目录 / 日志目录存在
/// 3. 初始化日志 (生产环境输出 JSON)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;
    }

    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  _
   / __ \(_)___  ___
  / / / / / __ \/ _ \
 / /_/ / / / / /  __/
/_____/_/_/ /_/\___/
    "#
    );
}
