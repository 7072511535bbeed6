//! Product Model
//!
//! 可销售商品。下单扣减 stock；删除为软删除 (is_deleted)。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type ProductId = RecordId;

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price, non-negative
    pub price: Decimal,
    /// Units on hand, never negative
    pub stock: i64,
    /// Record link to category
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    /// Record link to supplier
    #[serde(with = "serde_helpers::record_id")]
    pub supplier: RecordId,
    /// Stored upload filename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// 软删除标记，商品永不硬删除
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_deleted: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub supplier: RecordId,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub category: Option<RecordId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub supplier: Option<RecordId>,
    /// Some(new) 替换图片；删除旧文件由 handler 负责
    pub image: Option<String>,
    /// true 时移除当前图片
    pub remove_image: Option<bool>,
}
