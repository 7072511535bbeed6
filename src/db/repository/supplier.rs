//! Supplier Repository
//!
//! 删除前检查是否仍有商品或物料引用该供应商。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{merge_value, parse_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{Supplier, SupplierCreate, SupplierUpdate};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct SupplierRepository {
    base: BaseRepository,
}

impl SupplierRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Supplier>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM supplier ORDER BY name ASC")
            .await?;
        let suppliers: Vec<Supplier> = result.take(0)?;
        Ok(suppliers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Supplier> {
        let record = parse_id("supplier", id)?;
        let supplier: Option<Supplier> = self.base.db().select(record).await?;
        supplier.ok_or_else(|| RepoError::NotFound(format!("Supplier not found: {id}")))
    }

    pub async fn create(&self, data: SupplierCreate) -> RepoResult<Supplier> {
        let supplier = Supplier {
            id: None,
            name: data.name,
            email: data.email,
            phone: data.phone,
            address: data.address,
            created_at: now_millis(),
        };
        let created: Option<Supplier> =
            self.base.db().create("supplier").content(supplier).await?;
        created
            .ok_or_else(|| RepoError::Database("Supplier creation returned no record".to_string()))
    }

    pub async fn update(&self, id: &str, data: SupplierUpdate) -> RepoResult<Supplier> {
        let record = parse_id("supplier", id)?;
        let updated: Option<Supplier> = self
            .base
            .db()
            .update(record)
            .merge(merge_value(&data)?)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Supplier not found: {id}")))
    }

    /// Delete a supplier unless products or inventory items still reference it
    pub async fn delete(&self, id: &str) -> RepoResult<Supplier> {
        let record = parse_id("supplier", id)?;
        let key = record.to_string();

        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM product WHERE supplier = $supplier AND is_deleted = false GROUP ALL")
            .query("SELECT count() AS count FROM inventory_item WHERE supplier = $supplier GROUP ALL")
            .bind(("supplier", key.clone()))
            .await?;
        #[derive(serde::Deserialize)]
        struct Row {
            count: i64,
        }
        let products: Option<Row> = result.take(0)?;
        let items: Option<Row> = result.take(1)?;
        let in_use =
            products.map(|r| r.count).unwrap_or(0) + items.map(|r| r.count).unwrap_or(0);
        if in_use > 0 {
            return Err(RepoError::Validation(format!(
                "Supplier is referenced by {in_use} records and cannot be deleted"
            )));
        }

        let deleted: Option<Supplier> = self.base.db().delete(record).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Supplier not found: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::ProductCreate;
    use crate::db::repository::{CategoryRepository, ProductRepository};
    use crate::db::models::CategoryCreate;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn delete_blocked_while_products_reference_it() {
        let db = memory_db().await;
        let suppliers = SupplierRepository::new(db.clone());
        let categories = CategoryRepository::new(db.clone());
        let products = ProductRepository::new(db);

        let supplier = suppliers
            .create(SupplierCreate {
                name: "Fresh Farms".into(),
                email: None,
                phone: None,
                address: None,
            })
            .await
            .unwrap();
        let supplier_id = supplier.id.clone().unwrap();
        let category = categories
            .create(CategoryCreate {
                name: "Produce".into(),
                description: None,
            })
            .await
            .unwrap();

        let product = products
            .create(ProductCreate {
                name: "Tomatoes".into(),
                description: None,
                price: Decimal::new(250, 2),
                stock: 10,
                category: category.id.clone().unwrap(),
                supplier: supplier_id.clone(),
                image: None,
            })
            .await
            .unwrap();

        let err = suppliers
            .delete(&supplier_id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        // Soft-deleted products no longer block
        products
            .soft_delete(&product.id.unwrap().to_string())
            .await
            .unwrap();
        suppliers.delete(&supplier_id.to_string()).await.unwrap();
    }
}
