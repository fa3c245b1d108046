use std::path::PathBuf;
use std::time::Duration;

/// 持久化后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// 嵌入式 redb (work_dir/database/dine.redb)
    #[default]
    Redb,
    /// 进程内存 (重启丢失)
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 设置后同时写入按天滚动的日志文件 |
/// | STORAGE_BACKEND | redb | redb / memory |
/// | CATALOG_SEED | - | 目录种子 JSON 文件路径 |
/// | RESERVATION_AUTO_CONFIRM | false | 预订创建即确认 |
/// | NOTIFY_QUEUE_CAPACITY | 1024 | 通知队列容量 |
/// | NOTIFY_SINK_TIMEOUT_MS | 3000 | 单个推送端超时(毫秒) |
/// | WEBHOOK_URLS | - | 逗号分隔的 webhook 地址 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/dine HTTP_PORT=8080 CATALOG_SEED=./seed.json cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录
    pub log_dir: Option<String>,
    /// 持久化后端
    pub storage_backend: StorageBackend,
    /// 目录种子文件
    pub catalog_seed: Option<String>,
    /// 预订创建后直接进入 Confirmed
    pub reservation_auto_confirm: bool,
    /// 通知队列容量
    pub notify_queue_capacity: usize,
    /// 单个推送端超时 (毫秒)
    pub notify_sink_timeout_ms: u64,
    /// Webhook 推送地址
    pub webhook_urls: Vec<String>,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: env_opt("LOG_DIR"),
            storage_backend: env_parse("STORAGE_BACKEND", StorageBackend::Redb),
            catalog_seed: env_opt("CATALOG_SEED"),
            reservation_auto_confirm: env_parse("RESERVATION_AUTO_CONFIRM", false),
            notify_queue_capacity: env_parse("NOTIFY_QUEUE_CAPACITY", 1024),
            notify_sink_timeout_ms: env_parse("NOTIFY_SINK_TIMEOUT_MS", 3000),
            webhook_urls: env_opt("WEBHOOK_URLS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|u| !u.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景：内存存储，不推送 webhook
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.storage_backend = StorageBackend::Memory;
        config.catalog_seed = None;
        config.webhook_urls.clear();
        config
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// redb 数据库文件
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("dine.redb")
    }

    pub fn notify_sink_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_sink_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
