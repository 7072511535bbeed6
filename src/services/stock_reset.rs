//! 定时库存清零
//!
//! 扫描 inventory_item：stock_reset_date 已到期的物料数量清零，
//! 并在同一条 UPDATE 里清掉日期本身。日期即幂等键，重复运行
//! 不会二次清零。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use crate::db::models::InventoryItem;
use crate::utils::time::now_millis;

/// 单次扫描，返回清零的物料数
pub async fn run_once(db: &Surreal<Db>, now: i64) -> Result<usize, surrealdb::Error> {
    let mut result = db
        .query(
            "UPDATE inventory_item \
             SET quantity = 0, stock_reset_date = NONE \
             WHERE stock_reset_date != NONE AND stock_reset_date <= $now \
             RETURN AFTER",
        )
        .bind(("now", now))
        .await?;
    let reset: Vec<InventoryItem> = result.take(0)?;
    Ok(reset.len())
}

/// 周期循环，直到收到取消信号
pub async fn run(db: Surreal<Db>, interval_hours: u64, token: CancellationToken) {
    let interval = std::time::Duration::from_secs(interval_hours * 3600);
    tracing::info!(interval_hours, "Stock reset task started");

    loop {
        match run_once(&db, now_millis()).await {
            Ok(0) => tracing::debug!("Stock reset pass: nothing due"),
            Ok(n) => tracing::info!(reset = n, "Stock reset pass completed"),
            Err(e) => tracing::error!(error = %e, "Stock reset pass failed"),
        }

        tokio::select! {
            _ = token.cancelled() => {
                tracing::info!("Stock reset task stopping");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::{InventoryItemCreate, SupplierCreate};
    use crate::db::repository::{InventoryRepository, SupplierRepository};
    use rust_decimal::Decimal;

    async fn seed(db: &Surreal<Db>, name: &str, quantity: f64, reset_date: Option<i64>) -> String {
        let supplier = SupplierRepository::new(db.clone())
            .create(SupplierCreate {
                name: format!("sup-{name}"),
                email: None,
                phone: None,
                address: None,
            })
            .await
            .unwrap();
        InventoryRepository::new(db.clone())
            .create(InventoryItemCreate {
                name: name.into(),
                category: "Dry".into(),
                quantity: Some(quantity),
                unit: None,
                min_stock_level: None,
                supplier: supplier.id.unwrap(),
                cost_per_unit: Decimal::new(100, 2),
                expiry_date: None,
                stock_reset_date: reset_date,
            })
            .await
            .unwrap()
            .id
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn zeroes_due_items_and_is_idempotent() {
        let db = memory_db().await;
        let now = now_millis();
        let due = seed(&db, "Milk", 7.5, Some(now - 1_000)).await;
        let future = seed(&db, "Rice", 9.0, Some(now + 86_400_000)).await;
        let none = seed(&db, "Salt", 3.0, None).await;

        assert_eq!(run_once(&db, now).await.unwrap(), 1);

        let repo = InventoryRepository::new(db.clone());
        let milk = repo.find_by_id(&due).await.unwrap();
        assert_eq!(milk.quantity, 0.0);
        assert!(milk.stock_reset_date.is_none());
        assert_eq!(repo.find_by_id(&future).await.unwrap().quantity, 9.0);
        assert_eq!(repo.find_by_id(&none).await.unwrap().quantity, 3.0);

        // 日期已清除，重跑无事可做
        assert_eq!(run_once(&db, now).await.unwrap(), 0);
    }
}
