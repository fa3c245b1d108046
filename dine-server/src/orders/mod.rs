//! Order lifecycle
//!
//! - [`OrdersManager`] - 订单状态机，按订单 id 串行化所有修改
//! - [`ledger`] - 明细增删改与金额重算 (纯函数)
//! - [`OrderError`] - 订单错误

mod error;
pub mod ledger;
mod manager;


pub use error::{OrderError, OrderResult};
pub use manager::{ItemOp, OrdersManager};
