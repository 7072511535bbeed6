//! Supplier Model (供货公司目录)

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type SupplierId = RecordId;

/// Supply company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<SupplierId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Unix millis
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct SupplierCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
