//! Order Processor
//!
//! 校验段：逐行确认商品存在、数量合法、库存充足，并快照
//! 名称/分类/单价。提交段：单个事务内对每行条件复核库存，
//! 不足则 THROW 使整个事务回滚，然后统一扣减并落单。
//! 并发下单同一商品时，事务内的复核保证不会超卖。

use rust_decimal::Decimal;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::models::{Category, Order, OrderLine, Product, UserId};
use crate::db::repository::parse_id;
use crate::utils::time::now_millis;
use crate::utils::AppError;

const THROW_PREFIX: &str = "insufficient_stock:";
const MISSING_PREFIX: &str = "product_missing:";

/// Checkout 请求行，product 为 "product:id" 字符串
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequestLine {
    #[serde(alias = "productId")]
    pub product: String,
    pub quantity: i64,
}

/// Checkout 请求体
///
/// total_amount 仅供参考，服务端总是自行重算。
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub products: Vec<OrderRequestLine>,
    #[serde(default, alias = "totalAmount")]
    pub total_amount: Option<Decimal>,
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order has no items")]
    EmptyOrder,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Invalid quantity {quantity} for {product}")]
    InvalidQuantity { product: String, quantity: i64 },

    #[error("Insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for OrderError {
    fn from(err: surrealdb::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyOrder | OrderError::InvalidQuantity { .. } => {
                AppError::Validation(err.to_string())
            }
            OrderError::ProductNotFound(_) => AppError::NotFound(err.to_string()),
            OrderError::InsufficientStock { .. } => AppError::BusinessRule(err.to_string()),
            OrderError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[derive(Clone)]
pub struct OrderProcessor {
    db: Surreal<Db>,
}

impl OrderProcessor {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Validate the whole request, then commit it atomically
    pub async fn place_order(&self, user: UserId, request: OrderRequest) -> Result<Order, OrderError> {
        let lines = self.validate(&request).await?;
        let total_amount: Decimal = lines.iter().map(OrderLine::line_total).sum();
        let order = Order {
            id: None,
            user,
            items: lines,
            total_amount,
            ordered_at: now_millis(),
        };
        self.commit(order).await
    }

    /// Validation pass: snapshot每行的商品名/分类名/单价
    async fn validate(&self, request: &OrderRequest) -> Result<Vec<OrderLine>, OrderError> {
        if request.products.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let categories: Vec<Category> = self.db.select("category").await?;
        let category_name = |key: &str| {
            categories
                .iter()
                .find(|c| c.id.as_ref().is_some_and(|id| id.to_string() == key))
                .map(|c| c.name.clone())
        };

        let mut lines = Vec::with_capacity(request.products.len());
        for line in &request.products {
            if line.quantity <= 0 {
                return Err(OrderError::InvalidQuantity {
                    product: line.product.clone(),
                    quantity: line.quantity,
                });
            }
            let record = parse_id("product", &line.product)
                .map_err(|_| OrderError::ProductNotFound(line.product.clone()))?;
            let product: Option<Product> = self.db.select(record.clone()).await?;
            let product = match product {
                Some(p) if !p.is_deleted => p,
                _ => return Err(OrderError::ProductNotFound(line.product.clone())),
            };
            if product.stock < line.quantity {
                return Err(OrderError::InsufficientStock {
                    name: product.name,
                    requested: line.quantity,
                    available: product.stock,
                });
            }
            lines.push(OrderLine {
                product: record,
                category_name: category_name(&product.category.to_string()),
                name: product.name,
                quantity: line.quantity,
                price: product.price,
            });
        }
        Ok(lines)
    }

    /// Commit pass: one transaction, conditional re-check per line
    async fn commit(&self, order: Order) -> Result<Order, OrderError> {
        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..order.items.len() {
            sql.push_str(&format!(
                "LET $p{i} = (SELECT * FROM ONLY $pid{i});\n\
                 IF $p{i} = NONE {{ THROW '{MISSING_PREFIX}' + <string> $pid{i}; }};\n\
                 IF $p{i}.stock < $qty{i} {{ THROW '{THROW_PREFIX}' + $p{i}.name; }};\n\
                 UPDATE $pid{i} SET stock -= $qty{i};\n"
            ));
        }
        sql.push_str("CREATE order CONTENT $order;\n");
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self.db.query(sql);
        for (i, line) in order.items.iter().enumerate() {
            query = query
                .bind((format!("pid{i}"), line.product.clone()))
                .bind((format!("qty{i}"), line.quantity));
        }
        query = query.bind(("order", order.clone()));

        let response = query.await?;
        match response.check() {
            Ok(mut result) => {
                let last = result.num_statements().saturating_sub(1);
                let created: Option<Order> = result.take(last).unwrap_or(None);
                Ok(created.unwrap_or(order))
            }
            Err(err) => Err(map_commit_error(err, &order)),
        }
    }
}

/// 把事务里的 THROW 映射回 InsufficientStock
fn map_commit_error(err: surrealdb::Error, order: &Order) -> OrderError {
    let msg = err.to_string();
    if let Some(pos) = msg.find(MISSING_PREFIX) {
        let id = msg[pos + MISSING_PREFIX.len()..]
            .trim_end_matches(|c: char| c == '\'' || c == '"')
            .trim()
            .to_string();
        return OrderError::ProductNotFound(id);
    }
    if let Some(pos) = msg.find(THROW_PREFIX) {
        let name = msg[pos + THROW_PREFIX.len()..]
            .trim_end_matches(|c: char| c == '\'' || c == '"')
            .trim()
            .to_string();
        let (requested, available) = order
            .items
            .iter()
            .find(|l| l.name == name)
            .map(|l| (l.quantity, 0))
            .unwrap_or((0, 0));
        return OrderError::InsufficientStock {
            name,
            requested,
            available,
        };
    }
    OrderError::Database(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::{CategoryCreate, ProductCreate, SupplierCreate, UserRole};
    use crate::db::repository::{
        CategoryRepository, OrderRepository, ProductRepository, SupplierRepository, UserRepository,
    };
    use surrealdb::RecordId;

    struct Fixture {
        db: Surreal<Db>,
        processor: OrderProcessor,
        user: UserId,
    }

    async fn fixture() -> Fixture {
        let db = memory_db().await;
        let user = UserRepository::new(db.clone())
            .create("amy", "Amy", Some("12 High St"), "pw", UserRole::User)
            .await
            .unwrap()
            .id
            .unwrap();
        Fixture {
            processor: OrderProcessor::new(db.clone()),
            db,
            user,
        }
    }

    async fn seed_product(db: &Surreal<Db>, name: &str, cents: i64, stock: i64) -> RecordId {
        let category = CategoryRepository::new(db.clone())
            .create(CategoryCreate {
                name: "Mains".into(),
                description: None,
            })
            .await
            .unwrap();
        let supplier = SupplierRepository::new(db.clone())
            .create(SupplierCreate {
                name: "Acme".into(),
                email: None,
                phone: None,
                address: None,
            })
            .await
            .unwrap();
        ProductRepository::new(db.clone())
            .create(ProductCreate {
                name: name.into(),
                description: None,
                price: Decimal::new(cents, 2),
                stock,
                category: category.id.unwrap(),
                supplier: supplier.id.unwrap(),
                image: None,
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }

    async fn stock_of(db: &Surreal<Db>, id: &RecordId) -> i64 {
        let product: Option<Product> = db.select(id.clone()).await.unwrap();
        product.unwrap().stock
    }

    fn request(lines: Vec<(RecordId, i64)>) -> OrderRequest {
        OrderRequest {
            products: lines
                .into_iter()
                .map(|(product, quantity)| OrderRequestLine {
                    product: product.to_string(),
                    quantity,
                })
                .collect(),
            total_amount: None,
        }
    }

    #[tokio::test]
    async fn successful_order_decrements_stock_and_totals() {
        let fx = fixture().await;
        let burger = seed_product(&fx.db, "Burger", 500, 10).await;

        let order = fx
            .processor
            .place_order(fx.user.clone(), request(vec![(burger.clone(), 3)]))
            .await
            .unwrap();

        assert_eq!(order.total_amount, Decimal::new(1500, 2));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Burger");
        assert_eq!(order.items[0].category_name.as_deref(), Some("Mains"));
        assert_eq!(stock_of(&fx.db, &burger).await, 7);
    }

    #[tokio::test]
    async fn oversized_order_leaves_stock_untouched() {
        let fx = fixture().await;
        let burger = seed_product(&fx.db, "Burger", 500, 10).await;

        let err = fx
            .processor
            .place_order(fx.user.clone(), request(vec![(burger.clone(), 11)]))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock { available: 10, .. }));
        assert_eq!(stock_of(&fx.db, &burger).await, 10);
    }

    #[tokio::test]
    async fn failing_line_rolls_back_the_whole_order() {
        let fx = fixture().await;
        let burger = seed_product(&fx.db, "Burger", 500, 10).await;
        let cola = seed_product(&fx.db, "Cola", 150, 2).await;

        let err = fx
            .processor
            .place_order(
                fx.user.clone(),
                request(vec![(burger.clone(), 3), (cola.clone(), 5)]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock { .. }));
        assert_eq!(stock_of(&fx.db, &burger).await, 10);
        assert_eq!(stock_of(&fx.db, &cola).await, 2);
        assert!(
            OrderRepository::new(fx.db.clone())
                .find_all_with_users(None)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn snapshot_price_survives_later_price_change() {
        let fx = fixture().await;
        let burger = seed_product(&fx.db, "Burger", 500, 10).await;

        let order = fx
            .processor
            .place_order(fx.user.clone(), request(vec![(burger.clone(), 2)]))
            .await
            .unwrap();

        ProductRepository::new(fx.db.clone())
            .update(
                &burger.to_string(),
                crate::db::models::ProductUpdate {
                    price: Some(Decimal::new(900, 2)),
                    name: None,
                    description: None,
                    stock: None,
                    category: None,
                    supplier: None,
                    image: None,
                    remove_image: None,
                },
            )
            .await
            .unwrap();

        let listed = OrderRepository::new(fx.db.clone())
            .find_all_with_users(None)
            .await
            .unwrap();
        assert_eq!(listed[0].order.items[0].price, Decimal::new(500, 2));
        assert_eq!(listed[0].order.total_amount, order.total_amount);
        assert_eq!(listed[0].user_name.as_deref(), Some("Amy"));
    }

    #[tokio::test]
    async fn zero_quantity_and_empty_order_rejected() {
        let fx = fixture().await;
        let burger = seed_product(&fx.db, "Burger", 500, 10).await;

        assert!(matches!(
            fx.processor
                .place_order(fx.user.clone(), request(vec![(burger.clone(), 0)]))
                .await
                .unwrap_err(),
            OrderError::InvalidQuantity { .. }
        ));
        assert!(matches!(
            fx.processor
                .place_order(fx.user.clone(), request(vec![]))
                .await
                .unwrap_err(),
            OrderError::EmptyOrder
        ));
    }

    #[tokio::test]
    async fn concurrent_orders_never_oversell() {
        let fx = fixture().await;
        let burger = seed_product(&fx.db, "Burger", 500, 10).await;

        let a = {
            let processor = fx.processor.clone();
            let user = fx.user.clone();
            let product = burger.clone();
            tokio::spawn(
                async move { processor.place_order(user, request(vec![(product, 6)])).await },
            )
        };
        let b = {
            let processor = fx.processor.clone();
            let user = fx.user.clone();
            let product = burger.clone();
            tokio::spawn(
                async move { processor.place_order(user, request(vec![(product, 6)])).await },
            )
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert!(successes <= 1);

        let remaining = stock_of(&fx.db, &burger).await;
        assert!(remaining >= 0);
        assert_eq!(remaining, 10 - 6 * successes as i64);
    }
}
