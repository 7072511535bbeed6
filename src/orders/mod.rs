//! Order Processing Module
//!
//! 结账的两段式处理：Rust 侧全量校验，再在单个数据库事务内
//! 条件复核并提交。任何一行失败整单回滚。

mod processor;

pub use processor::{OrderError, OrderProcessor, OrderRequest, OrderRequestLine};
