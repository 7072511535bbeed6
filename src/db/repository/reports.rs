//! Reports Repository
//!
//! 仪表盘聚合与月度支出汇总。标量合计用 SurrealQL math::sum，
//! top seller 与按分类支出在 Rust 侧折叠 (行项目内嵌在订单里)。

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Category, ExpenseCategory, OrderLine, Product};
use crate::utils::time::{day_bounds, month_bounds, previous_month};

/// stock 低于该值 (且大于 0) 视为低库存商品
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// 仪表盘上的商品库存条目
#[derive(Debug, Clone, Serialize)]
pub struct ProductStockInfo {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub category_name: Option<String>,
}

/// 累计销量最高的商品
#[derive(Debug, Clone, Serialize)]
pub struct TopSeller {
    pub product: String,
    pub name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryExpense {
    pub category: ExpenseCategory,
    pub total: Decimal,
}

/// Dashboard aggregate payload
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub total_stock_units: i64,
    pub orders_today: i64,
    pub total_revenue: Decimal,
    pub out_of_stock: Vec<ProductStockInfo>,
    pub low_stock: Vec<ProductStockInfo>,
    pub top_seller: Option<TopSeller>,
    pub expenses_today: Decimal,
    pub expenses_this_month: Decimal,
    pub expenses_by_category: Vec<CategoryExpense>,
}

/// Totals for one calendar month of expenses
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyExpenseSummary {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
    pub count: i64,
    pub by_category: Vec<CategoryExpense>,
}

/// Current month next to the previous one
#[derive(Debug, Clone, Serialize)]
pub struct MonthComparison {
    pub current: MonthlyExpenseSummary,
    pub previous: MonthlyExpenseSummary,
    pub change: Decimal,
    /// None when the previous month had no expenses
    pub change_percent: Option<Decimal>,
}

#[derive(Deserialize)]
struct CountRow {
    count: i64,
}

#[derive(Deserialize)]
struct SumRow {
    total: Option<f64>,
}

#[derive(Deserialize)]
struct ItemsRow {
    items: Vec<OrderLine>,
}

fn decimal_from(total: Option<f64>) -> Decimal {
    total
        .and_then(|f| Decimal::try_from(f).ok())
        .unwrap_or_default()
}

#[derive(Clone)]
pub struct ReportsRepository {
    base: BaseRepository,
}

impl ReportsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Build the dashboard for the given wall-clock instant
    pub async fn dashboard(&self, now: i64) -> RepoResult<DashboardSummary> {
        let (day_start, day_end) = day_bounds(now);

        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM product WHERE is_deleted = false GROUP ALL")
            .query("SELECT math::sum(stock) AS total FROM product WHERE is_deleted = false GROUP ALL")
            .query("SELECT count() AS count FROM order WHERE ordered_at >= $day_start AND ordered_at < $day_end GROUP ALL")
            .query("SELECT math::sum(total_amount) AS total FROM order GROUP ALL")
            .query("SELECT * FROM product WHERE is_deleted = false AND stock = 0")
            .query("SELECT * FROM product WHERE is_deleted = false AND stock > 0 AND stock < $low")
            .bind(("day_start", day_start))
            .bind(("day_end", day_end))
            .bind(("low", LOW_STOCK_THRESHOLD))
            .await?;

        let total_products: Option<CountRow> = result.take(0)?;
        let stock_sum: Option<SumRow> = result.take(1)?;
        let orders_today: Option<CountRow> = result.take(2)?;
        let revenue: Option<SumRow> = result.take(3)?;
        let out_of_stock: Vec<Product> = result.take(4)?;
        let low_stock: Vec<Product> = result.take(5)?;

        let category_names = self.category_names().await?;
        let out_of_stock = stock_info(out_of_stock, &category_names);
        let low_stock = stock_info(low_stock, &category_names);

        // total_stock_units 是整数库存之和，float 传回后无损
        let total_stock_units = stock_sum.and_then(|r| r.total).unwrap_or(0.0) as i64;

        let summary = DashboardSummary {
            total_products: total_products.map(|r| r.count).unwrap_or(0),
            total_stock_units,
            orders_today: orders_today.map(|r| r.count).unwrap_or(0),
            total_revenue: decimal_from(revenue.and_then(|r| r.total)),
            out_of_stock,
            low_stock,
            top_seller: self.top_seller().await?,
            expenses_today: self.expense_total(day_start, day_end).await?,
            expenses_this_month: Decimal::ZERO,
            expenses_by_category: Vec::new(),
        };

        let (year, month) = current_year_month(now);
        let month_summary = self.monthly_expense_summary(year, month).await?;
        Ok(DashboardSummary {
            expenses_this_month: month_summary.total,
            expenses_by_category: month_summary.by_category,
            ..summary
        })
    }

    /// Product with the highest cumulative ordered quantity
    async fn top_seller(&self) -> RepoResult<Option<TopSeller>> {
        let mut result = self.base.db().query("SELECT items FROM order").await?;
        let rows: Vec<ItemsRow> = result.take(0)?;

        let mut totals: HashMap<String, TopSeller> = HashMap::new();
        for row in rows {
            for line in row.items {
                let key = line.product.to_string();
                totals
                    .entry(key.clone())
                    .and_modify(|t| t.total_quantity += line.quantity)
                    .or_insert(TopSeller {
                        product: key,
                        name: line.name.clone(),
                        total_quantity: line.quantity,
                    });
            }
        }
        Ok(totals
            .into_values()
            .max_by_key(|t| (t.total_quantity, std::cmp::Reverse(t.product.clone()))))
    }

    async fn expense_total(&self, start: i64, end: i64) -> RepoResult<Decimal> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(amount) AS total FROM expense \
                 WHERE expense_date >= $start AND expense_date < $end GROUP ALL",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let row: Option<SumRow> = result.take(0)?;
        Ok(decimal_from(row.and_then(|r| r.total)))
    }

    /// Totals for one calendar month, with a per-category breakdown
    pub async fn monthly_expense_summary(
        &self,
        year: i32,
        month: u32,
    ) -> RepoResult<MonthlyExpenseSummary> {
        let (start, end) = month_bounds(year, month)
            .ok_or_else(|| RepoError::Validation(format!("Invalid month: {year}-{month}")))?;

        let expenses = super::ExpenseRepository::new(self.base.db().clone())
            .find_in_range(start, end)
            .await?;

        let mut total = Decimal::ZERO;
        let mut by_category: HashMap<ExpenseCategory, Decimal> = HashMap::new();
        for expense in &expenses {
            total += expense.amount;
            *by_category.entry(expense.category).or_default() += expense.amount;
        }
        let mut by_category: Vec<CategoryExpense> = by_category
            .into_iter()
            .map(|(category, total)| CategoryExpense { category, total })
            .collect();
        by_category.sort_by(|a, b| b.total.cmp(&a.total));

        Ok(MonthlyExpenseSummary {
            year,
            month,
            total,
            count: expenses.len() as i64,
            by_category,
        })
    }

    /// Current month next to the previous one, with the delta
    pub async fn month_comparison(&self, now: i64) -> RepoResult<MonthComparison> {
        let (year, month) = current_year_month(now);
        let (prev_year, prev_month) = previous_month(year, month);

        let current = self.monthly_expense_summary(year, month).await?;
        let previous = self.monthly_expense_summary(prev_year, prev_month).await?;

        let change = current.total - previous.total;
        let change_percent = if previous.total.is_zero() {
            None
        } else {
            Some(change / previous.total * Decimal::ONE_HUNDRED)
        };

        Ok(MonthComparison {
            current,
            previous,
            change,
            change_percent,
        })
    }

    async fn category_names(&self) -> RepoResult<HashMap<String, String>> {
        let categories: Vec<Category> = self.base.db().select("category").await?;
        Ok(categories
            .into_iter()
            .filter_map(|c| c.id.as_ref().map(|id| (id.to_string(), c.name.clone())))
            .collect())
    }
}

fn stock_info(
    products: Vec<Product>,
    category_names: &HashMap<String, String>,
) -> Vec<ProductStockInfo> {
    products
        .into_iter()
        .map(|p| ProductStockInfo {
            id: p.id.map(|id| id.to_string()).unwrap_or_default(),
            name: p.name,
            stock: p.stock,
            category_name: category_names.get(&p.category.to_string()).cloned(),
        })
        .collect()
}

fn current_year_month(now: i64) -> (i32, u32) {
    use chrono::{DateTime, Datelike, Utc};
    let dt = DateTime::<Utc>::from_timestamp_millis(now).unwrap_or_default();
    (dt.year(), dt.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::{
        CategoryCreate, ExpenseCategory, ExpenseCreate, Order, ProductCreate, SupplierCreate,
        UserRole,
    };
    use crate::db::repository::{
        CategoryRepository, ExpenseRepository, ProductRepository, SupplierRepository,
        UserRepository,
    };
    use crate::utils::time::now_millis;
    use surrealdb::RecordId;

    async fn seed_product(db: &Surreal<Db>, name: &str, stock: i64) -> RecordId {
        let category = CategoryRepository::new(db.clone())
            .create(CategoryCreate {
                name: format!("cat-{name}"),
                description: None,
            })
            .await
            .unwrap();
        let supplier = SupplierRepository::new(db.clone())
            .create(SupplierCreate {
                name: format!("sup-{name}"),
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
                price: Decimal::new(500, 2),
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

    #[tokio::test]
    async fn stock_buckets_use_strict_boundaries() {
        let db = memory_db().await;
        seed_product(&db, "Empty", 0).await;
        seed_product(&db, "Low", 3).await;
        // Exactly at the threshold is healthy
        seed_product(&db, "AtThreshold", 5).await;

        let summary = ReportsRepository::new(db)
            .dashboard(now_millis())
            .await
            .unwrap();

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_stock_units, 8);
        assert_eq!(summary.out_of_stock.len(), 1);
        assert_eq!(summary.out_of_stock[0].name, "Empty");
        assert_eq!(summary.low_stock.len(), 1);
        assert_eq!(summary.low_stock[0].name, "Low");
        assert!(summary.low_stock[0].category_name.is_some());
    }

    #[tokio::test]
    async fn top_seller_folds_over_order_lines() {
        let db = memory_db().await;
        let burger = seed_product(&db, "Burger", 50).await;
        let cola = seed_product(&db, "Cola", 50).await;
        let user = UserRepository::new(db.clone())
            .create("amy", "Amy", None, "pw", UserRole::User)
            .await
            .unwrap();

        let lines = [(burger.clone(), 2), (cola.clone(), 5), (burger.clone(), 4)];
        for (product, quantity) in lines {
            let line = OrderLine {
                product,
                name: "x".into(),
                category_name: None,
                quantity,
                price: Decimal::new(500, 2),
            };
            let order = Order {
                id: None,
                user: user.id.clone().unwrap(),
                total_amount: line.line_total(),
                items: vec![line],
                ordered_at: now_millis(),
            };
            let _: Option<Order> = db.create("order").content(order).await.unwrap();
        }

        let summary = ReportsRepository::new(db)
            .dashboard(now_millis())
            .await
            .unwrap();
        let top = summary.top_seller.unwrap();
        assert_eq!(top.product, burger.to_string());
        assert_eq!(top.total_quantity, 6);
        // 2*5.00 + 5*5.00 + 4*5.00
        assert_eq!(summary.total_revenue, Decimal::new(5500, 2));
        assert_eq!(summary.orders_today, 3);
    }

    #[tokio::test]
    async fn monthly_summary_respects_calendar_bounds() {
        let db = memory_db().await;
        let expenses = ExpenseRepository::new(db.clone());
        let (july_start, july_end) = month_bounds(2026, 7).unwrap();

        let seed = [
            ("Rent July", ExpenseCategory::Rent, 120_000, july_start),
            ("Veg July", ExpenseCategory::Ingredients, 3_550, july_end - 1),
            ("Rent August", ExpenseCategory::Rent, 120_000, july_end),
        ];
        for (title, category, cents, date) in seed {
            expenses
                .create(
                    ExpenseCreate {
                        title: title.into(),
                        category,
                        amount: Decimal::new(cents, 2),
                        payment_method: None,
                        paid_to: None,
                        expense_date: date,
                        status: None,
                        notes: None,
                    },
                    vec![],
                )
                .await
                .unwrap();
        }

        let reports = ReportsRepository::new(db);
        let july = reports.monthly_expense_summary(2026, 7).await.unwrap();
        assert_eq!(july.count, 2);
        assert_eq!(july.total, Decimal::new(123_550, 2));
        assert_eq!(july.by_category.len(), 2);
        assert_eq!(july.by_category[0].category, ExpenseCategory::Rent);

        let august = reports.monthly_expense_summary(2026, 8).await.unwrap();
        assert_eq!(august.count, 1);

        assert!(reports.monthly_expense_summary(2026, 13).await.is_err());
    }
}
