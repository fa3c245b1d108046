//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - [`KeyedLocks`] - 按 key 加锁
//! - 日志初始化

pub mod keyed_lock;
pub mod logger;

pub use keyed_lock::KeyedLocks;
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
