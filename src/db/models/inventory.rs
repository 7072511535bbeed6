//! Inventory Item Model (后厨物料)
//!
//! 与 Product (可销售商品) 是不同实体。带可选的定期清零日期，
//! 由后台任务扫描处理。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type InventoryItemId = RecordId;

/// Kitchen supply item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<InventoryItemId>,
    pub name: String,
    /// 物料分类 (自由文本，与商品分类无关)
    pub category: String,
    #[serde(default)]
    pub quantity: f64,
    /// 计量单位，如 "kg", "pcs"
    #[serde(default = "default_unit")]
    pub unit: String,
    /// 低于该值视为低库存
    #[serde(default)]
    pub min_stock_level: f64,
    /// Record link to supplier
    #[serde(with = "serde_helpers::record_id")]
    pub supplier: RecordId,
    pub cost_per_unit: Decimal,
    /// Unix millis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
    /// Unix millis；到期后由后台任务清零 quantity 并清除本字段
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_reset_date: Option<i64>,
    pub created_at: i64,
}

fn default_unit() -> String {
    "pcs".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct InventoryItemCreate {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    pub category: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_stock_level: Option<f64>,
    #[serde(with = "serde_helpers::record_id")]
    pub supplier: RecordId,
    pub cost_per_unit: Decimal,
    pub expiry_date: Option<i64>,
    pub stock_reset_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_stock_level: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub supplier: Option<RecordId>,
    pub cost_per_unit: Option<Decimal>,
    pub expiry_date: Option<i64>,
    pub stock_reset_date: Option<i64>,
}
