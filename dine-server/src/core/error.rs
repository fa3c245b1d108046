//! 启动 / 运行期错误 (不面向 API 调用方)

use crate::catalog::CatalogError;
use crate::reservations::ReservationError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("存储初始化失败: {0}")]
    Storage(#[from] StorageError),

    #[error("目录加载失败: {0}")]
    Catalog(#[from] CatalogError),

    #[error("预订恢复失败: {0}")]
    Recovery(#[from] ReservationError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
