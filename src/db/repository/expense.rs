//! Expense Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{merge_value, parse_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{Expense, ExpenseCreate, ExpenseUpdate};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct ExpenseRepository {
    base: BaseRepository,
}

impl ExpenseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Expense>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM expense ORDER BY expense_date DESC")
            .await?;
        let expenses: Vec<Expense> = result.take(0)?;
        Ok(expenses)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Expense> {
        let record = parse_id("expense", id)?;
        let expense: Option<Expense> = self.base.db().select(record).await?;
        expense.ok_or_else(|| RepoError::NotFound(format!("Expense not found: {id}")))
    }

    /// Expenses with expense_date in [start, end), oldest first
    pub async fn find_in_range(&self, start: i64, end: i64) -> RepoResult<Vec<Expense>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM expense \
                 WHERE expense_date >= $start AND expense_date < $end \
                 ORDER BY expense_date ASC",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let expenses: Vec<Expense> = result.take(0)?;
        Ok(expenses)
    }

    pub async fn create(&self, data: ExpenseCreate, attachments: Vec<String>) -> RepoResult<Expense> {
        if data.amount.is_sign_negative() {
            return Err(RepoError::Validation("amount must not be negative".into()));
        }
        let expense = Expense {
            id: None,
            title: data.title,
            category: data.category,
            amount: data.amount,
            payment_method: data.payment_method.unwrap_or_default(),
            paid_to: data.paid_to,
            expense_date: data.expense_date,
            attachments,
            status: data.status.unwrap_or_default(),
            notes: data.notes,
            created_at: now_millis(),
        };
        let created: Option<Expense> = self.base.db().create("expense").content(expense).await?;
        created
            .ok_or_else(|| RepoError::Database("Expense creation returned no record".to_string()))
    }

    pub async fn update(&self, id: &str, data: ExpenseUpdate) -> RepoResult<Expense> {
        if data.amount.is_some_and(|a| a.is_sign_negative()) {
            return Err(RepoError::Validation("amount must not be negative".into()));
        }
        let record = parse_id("expense", id)?;
        let updated: Option<Expense> = self
            .base
            .db()
            .update(record)
            .merge(merge_value(&data)?)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Expense not found: {id}")))
    }

    /// Replace the stored attachment paths
    pub async fn set_attachments(&self, id: &str, paths: Vec<String>) -> RepoResult<Expense> {
        let record = parse_id("expense", id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $expense SET attachments = $paths RETURN AFTER")
            .bind(("expense", record))
            .bind(("paths", paths))
            .await?;
        let updated: Option<Expense> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Expense not found: {id}")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Expense> {
        let record = parse_id("expense", id)?;
        let deleted: Option<Expense> = self.base.db().delete(record).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Expense not found: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::db::models::ExpenseCategory;
    use crate::utils::time::month_bounds;
    use rust_decimal::Decimal;

    fn payload(title: &str, amount: Decimal, expense_date: i64) -> ExpenseCreate {
        ExpenseCreate {
            title: title.into(),
            category: ExpenseCategory::Ingredients,
            amount,
            payment_method: None,
            paid_to: None,
            expense_date,
            status: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn range_query_is_half_open() {
        let db = memory_db().await;
        let repo = ExpenseRepository::new(db);

        let (july_start, july_end) = month_bounds(2026, 7).unwrap();
        repo.create(payload("First of July", Decimal::new(1000, 2), july_start), vec![])
            .await
            .unwrap();
        // Last millisecond of July is still July
        repo.create(payload("End of July", Decimal::new(2000, 2), july_end - 1), vec![])
            .await
            .unwrap();
        // Exactly at the upper bound belongs to August
        repo.create(payload("First of August", Decimal::new(3000, 2), july_end), vec![])
            .await
            .unwrap();

        let july = repo.find_in_range(july_start, july_end).await.unwrap();
        assert_eq!(july.len(), 2);
        assert_eq!(july[0].title, "First of July");
        assert_eq!(july[1].title, "End of July");
    }

    #[tokio::test]
    async fn attachments_replaced() {
        let db = memory_db().await;
        let repo = ExpenseRepository::new(db);

        let expense = repo
            .create(
                payload("Gas bill", Decimal::new(4500, 2), 1_700_000_000_000),
                vec!["expenses/a.pdf".into()],
            )
            .await
            .unwrap();
        let id = expense.id.unwrap().to_string();

        let updated = repo
            .set_attachments(&id, vec!["expenses/b.pdf".into()])
            .await
            .unwrap();
        assert_eq!(updated.attachments, vec!["expenses/b.pdf"]);
    }
}
