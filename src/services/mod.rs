//! Services Module
//!
//! 后台任务与文件存储

pub mod stock_reset;
pub mod upload_store;
