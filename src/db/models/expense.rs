//! Expense Model
//!
//! 支出记录，附件以相对路径存储在 uploads/expenses/ 下。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type ExpenseId = RecordId;

/// 支出分类
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Rent,
    Salaries,
    Ingredients,
    Utilities,
    Maintenance,
    Marketing,
    Equipment,
    Licensing,
    #[serde(rename = "Cleaning Supplies")]
    CleaningSupplies,
    Taxes,
    Other,
}

/// 付款方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Upi,
    Cheque,
    Other,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Cash
    }
}

/// 支出状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseStatus {
    Pending,
    Paid,
    Disputed,
}

impl Default for ExpenseStatus {
    fn default() -> Self {
        Self::Paid
    }
}

/// Expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ExpenseId>,
    pub title: String,
    pub category: ExpenseCategory,
    /// Non-negative
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_to: Option<String>,
    /// Unix millis
    pub expense_date: i64,
    /// Stored file paths relative to the uploads dir
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Create payload — 表单字段部分 (附件走 multipart 文件域)
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct ExpenseCreate {
    #[validate(length(min = 2, message = "title must be at least 2 characters"))]
    pub title: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub paid_to: Option<String>,
    pub expense_date: i64,
    pub status: Option<ExpenseStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExpenseUpdate {
    pub title: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub amount: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
    pub paid_to: Option<String>,
    pub expense_date: Option<i64>,
    pub status: Option<ExpenseStatus>,
    pub notes: Option<String>,
}
