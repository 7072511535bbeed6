//! Inventory Repository (后厨物料)

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{merge_value, parse_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct InventoryRepository {
    base: BaseRepository,
}

impl InventoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<InventoryItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM inventory_item ORDER BY created_at DESC")
            .await?;
        let items: Vec<InventoryItem> = result.take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<InventoryItem> {
        let record = parse_id("inventory_item", id)?;
        let item: Option<InventoryItem> = self.base.db().select(record).await?;
        item.ok_or_else(|| RepoError::NotFound(format!("Inventory item not found: {id}")))
    }

    pub async fn find_by_category(&self, category: &str) -> RepoResult<Vec<InventoryItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM inventory_item WHERE category = $category ORDER BY name ASC")
            .bind(("category", category.to_string()))
            .await?;
        let items: Vec<InventoryItem> = result.take(0)?;
        Ok(items)
    }

    /// Items whose quantity has fallen below their own minimum
    pub async fn find_low_stock(&self) -> RepoResult<Vec<InventoryItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM inventory_item WHERE quantity < min_stock_level ORDER BY name ASC")
            .await?;
        let items: Vec<InventoryItem> = result.take(0)?;
        Ok(items)
    }

    pub async fn create(&self, data: InventoryItemCreate) -> RepoResult<InventoryItem> {
        if data.quantity.unwrap_or(0.0) < 0.0 {
            return Err(RepoError::Validation("quantity must not be negative".into()));
        }
        let item = InventoryItem {
            id: None,
            name: data.name,
            category: data.category,
            quantity: data.quantity.unwrap_or(0.0),
            unit: data.unit.unwrap_or_else(|| "pcs".to_string()),
            min_stock_level: data.min_stock_level.unwrap_or(0.0),
            supplier: data.supplier,
            cost_per_unit: data.cost_per_unit,
            expiry_date: data.expiry_date,
            stock_reset_date: data.stock_reset_date,
            created_at: now_millis(),
        };
        let created: Option<InventoryItem> = self
            .base
            .db()
            .create("inventory_item")
            .content(item)
            .await?;
        created.ok_or_else(|| {
            RepoError::Database("Inventory item creation returned no record".to_string())
        })
    }

    pub async fn update(&self, id: &str, data: InventoryItemUpdate) -> RepoResult<InventoryItem> {
        if data.quantity.is_some_and(|q| q < 0.0) {
            return Err(RepoError::Validation("quantity must not be negative".into()));
        }
        let record = parse_id("inventory_item", id)?;
        let updated: Option<InventoryItem> = self
            .base
            .db()
            .update(record)
            .merge(merge_value(&data)?)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Inventory item not found: {id}")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<InventoryItem> {
        let record = parse_id("inventory_item", id)?;
        let deleted: Option<InventoryItem> = self.base.db().delete(record).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Inventory item not found: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::SupplierCreate;
    use crate::db::repository::SupplierRepository;
    use rust_decimal::Decimal;
    use surrealdb::RecordId;

    async fn seed_supplier(db: &Surreal<Db>) -> RecordId {
        SupplierRepository::new(db.clone())
            .create(SupplierCreate {
                name: "Metro Wholesale".into(),
                email: None,
                phone: None,
                address: None,
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }

    async fn seed_item(
        repo: &InventoryRepository,
        supplier: &RecordId,
        name: &str,
        category: &str,
        quantity: f64,
        min: f64,
    ) -> InventoryItem {
        repo.create(InventoryItemCreate {
            name: name.into(),
            category: category.into(),
            quantity: Some(quantity),
            unit: Some("kg".into()),
            min_stock_level: Some(min),
            supplier: supplier.clone(),
            cost_per_unit: Decimal::new(150, 2),
            expiry_date: None,
            stock_reset_date: None,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn low_stock_uses_per_item_threshold() {
        let db = memory_db().await;
        let repo = InventoryRepository::new(db.clone());
        let supplier = seed_supplier(&db).await;

        seed_item(&repo, &supplier, "Flour", "Dry", 2.0, 5.0).await;
        seed_item(&repo, &supplier, "Rice", "Dry", 8.0, 5.0).await;
        // At the threshold is not low
        seed_item(&repo, &supplier, "Sugar", "Dry", 5.0, 5.0).await;

        let low = repo.find_low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Flour");
    }

    #[tokio::test]
    async fn filter_by_category() {
        let db = memory_db().await;
        let repo = InventoryRepository::new(db.clone());
        let supplier = seed_supplier(&db).await;

        seed_item(&repo, &supplier, "Flour", "Dry", 2.0, 5.0).await;
        seed_item(&repo, &supplier, "Milk", "Dairy", 6.0, 2.0).await;

        let dairy = repo.find_by_category("Dairy").await.unwrap();
        assert_eq!(dairy.len(), 1);
        assert_eq!(dairy[0].name, "Milk");
    }
}
