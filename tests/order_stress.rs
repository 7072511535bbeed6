//! 订单并发压力测试
//!
//! 使用 ServerState::initialize 完整初始化 (真实 RocksDB 存储)，
//! 多任务并发下单同一商品，校验库存只减不超卖。

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use larder_server::db::models::{CategoryCreate, Product, ProductCreate, SupplierCreate, UserRole};
use larder_server::db::repository::{
    CategoryRepository, OrderRepository, ProductRepository, SupplierRepository, UserRepository,
};
use larder_server::orders::{OrderProcessor, OrderRequest, OrderRequestLine};
use larder_server::{Config, ServerState};
use rand::Rng;
use rust_decimal::Decimal;

const TASKS: usize = 40;
const INITIAL_STOCK: i64 = 60;

#[tokio::test]
async fn concurrent_checkouts_never_oversell() {
    let work_dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(work_dir.path().to_str().unwrap(), 0);
    let state = ServerState::initialize(config)
        .await
        .expect("state initialization");
    let db = state.get_db();

    let user = UserRepository::new(db.clone())
        .create("cashier", "Cashier", None, "pw", UserRole::User)
        .await
        .expect("seed user")
        .id
        .unwrap();
    let category = CategoryRepository::new(db.clone())
        .create(CategoryCreate {
            name: "Drinks".into(),
            description: None,
        })
        .await
        .expect("seed category");
    let supplier = SupplierRepository::new(db.clone())
        .create(SupplierCreate {
            name: "Acme".into(),
            email: None,
            phone: None,
            address: None,
        })
        .await
        .expect("seed supplier");
    let product = ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: "Cola".into(),
            description: None,
            price: Decimal::new(250, 2),
            stock: INITIAL_STOCK,
            category: category.id.unwrap(),
            supplier: supplier.id.unwrap(),
            image: None,
        })
        .await
        .expect("seed product")
        .id
        .unwrap();

    let sold = Arc::new(AtomicI64::new(0));
    let mut rng = rand::thread_rng();
    let mut handles = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        let processor = OrderProcessor::new(db.clone());
        let user = user.clone();
        let product = product.clone();
        let sold = sold.clone();
        let quantity: i64 = rng.gen_range(1..=3);
        handles.push(tokio::spawn(async move {
            let request = OrderRequest {
                products: vec![OrderRequestLine {
                    product: product.to_string(),
                    quantity,
                }],
                total_amount: None,
            };
            if processor.place_order(user, request).await.is_ok() {
                sold.fetch_add(quantity, Ordering::SeqCst);
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task join");
    }

    let remaining: Option<Product> = db.select(product).await.expect("select product");
    let remaining = remaining.expect("product exists").stock;
    let sold = sold.load(Ordering::SeqCst);

    assert!(remaining >= 0, "stock went negative: {remaining}");
    assert_eq!(
        remaining,
        INITIAL_STOCK - sold,
        "stock does not match successful orders"
    );

    // 订单数与扣减一致
    let orders = OrderRepository::new(db.clone())
        .find_all_with_users(None)
        .await
        .expect("list orders");
    let ordered: i64 = orders
        .iter()
        .flat_map(|o| o.order.items.iter())
        .map(|l| l.quantity)
        .sum();
    assert_eq!(ordered, sold);
}
