//! Order Model
//!
//! 结账时一次性创建，之后不可变。行项目在下单时刻快照
//! (商品名、分类名、单价)，后续改价不影响历史订单。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type OrderId = RecordId;

/// 订单行项目 (快照)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Record link to product
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// 商品名快照
    pub name: String,
    /// 分类名快照
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub quantity: i64,
    /// 下单时刻的单价快照
    pub price: Decimal,
}

impl OrderLine {
    /// quantity × price
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Order entity (immutable after creation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    /// Record link to the ordering user
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub items: Vec<OrderLine>,
    /// 服务端重新计算的总额 = Σ quantity × price
    pub total_amount: Decimal,
    /// Unix millis
    pub ordered_at: i64,
}

/// 订单 + 下单用户信息 (列表展示用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithUser {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: Option<String>,
    pub user_address: Option<String>,
}
