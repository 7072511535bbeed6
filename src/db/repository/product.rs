//! Product Repository
//!
//! 商品删除为软删除：历史订单行仍引用 product 记录。
//! 库存扣减不在这里，在订单处理事务内完成。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{merge_value, parse_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List products that have not been soft-deleted, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_deleted = false ORDER BY created_at DESC")
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Product> {
        let record = parse_id("product", id)?;
        let product: Option<Product> = self.base.db().select(record).await?;
        match product {
            Some(p) if !p.is_deleted => Ok(p),
            _ => Err(RepoError::NotFound(format!("Product not found: {id}"))),
        }
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price.is_sign_negative() {
            return Err(RepoError::Validation("price must not be negative".into()));
        }
        if data.stock < 0 {
            return Err(RepoError::Validation("stock must not be negative".into()));
        }
        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            price: data.price,
            stock: data.stock,
            category: data.category,
            supplier: data.supplier,
            image: data.image,
            is_deleted: false,
            created_at: now_millis(),
        };
        let created: Option<Product> = self.base.db().create("product").content(product).await?;
        created
            .ok_or_else(|| RepoError::Database("Product creation returned no record".to_string()))
    }

    /// Apply a partial update
    ///
    /// remove_image 只是 API 控制位，不入库；图片清除走 clear_image。
    pub async fn update(&self, id: &str, mut data: ProductUpdate) -> RepoResult<Product> {
        if let Some(price) = data.price {
            if price.is_sign_negative() {
                return Err(RepoError::Validation("price must not be negative".into()));
            }
        }
        if let Some(stock) = data.stock {
            if stock < 0 {
                return Err(RepoError::Validation("stock must not be negative".into()));
            }
        }
        // Existence check also filters soft-deleted records
        self.find_by_id(id).await?;
        let record = parse_id("product", id)?;
        data.remove_image = None;
        let updated: Option<Product> = self
            .base
            .db()
            .update(record)
            .merge(merge_value(&data)?)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product not found: {id}")))
    }

    pub async fn clear_image(&self, id: &str) -> RepoResult<Product> {
        let record = parse_id("product", id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $product SET image = NONE RETURN AFTER")
            .bind(("product", record))
            .await?;
        let updated: Option<Product> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product not found: {id}")))
    }

    /// Soft delete, keeping the record for order history
    pub async fn soft_delete(&self, id: &str) -> RepoResult<Product> {
        // Repeated deletes report not found
        self.find_by_id(id).await?;
        let record = parse_id("product", id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $product SET is_deleted = true RETURN AFTER")
            .bind(("product", record))
            .await?;
        let updated: Option<Product> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product not found: {id}")))
    }
}
