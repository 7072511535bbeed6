//! Staff Model (员工档案与排班)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type StaffId = RecordId;

/// 星期
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// 岗位
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StaffRole {
    Chef,
    Waiter,
    Manager,
    Cleaner,
    Cashier,
    Receptionist,
    Delivery,
    #[serde(rename = "Kitchen Assistant")]
    KitchenAssistant,
}

impl Default for StaffRole {
    fn default() -> Self {
        Self::Waiter
    }
}

/// 部门
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Department {
    Kitchen,
    Service,
    Billing,
    Cleaning,
    Reception,
    Delivery,
    Management,
}

impl Default for Department {
    fn default() -> Self {
        Self::Service
    }
}

/// 在职状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StaffStatus {
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Terminated,
}

impl Default for StaffStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// 单个班段，如 "09:00" - "17:00"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

/// 单日排班
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: Weekday,
    pub time_slots: Vec<TimeSlot>,
}

/// Staff member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<StaffId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub role: StaffRole,
    #[serde(default)]
    pub department: Department,
    #[serde(default)]
    pub salary: Decimal,
    /// Unix millis
    pub salary_due_date: i64,
    #[serde(default)]
    pub status: StaffStatus,
    #[serde(default)]
    pub shift_schedule: Vec<DaySchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Unix millis
    pub joining_date: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct StaffCreate {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub role: Option<StaffRole>,
    pub department: Option<Department>,
    pub salary: Option<Decimal>,
    pub salary_due_date: i64,
    pub status: Option<StaffStatus>,
    pub shift_schedule: Option<Vec<DaySchedule>>,
    pub image: Option<String>,
    pub notes: Option<String>,
    pub joining_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub role: Option<StaffRole>,
    pub department: Option<Department>,
    pub salary: Option<Decimal>,
    pub salary_due_date: Option<i64>,
    pub status: Option<StaffStatus>,
    pub shift_schedule: Option<Vec<DaySchedule>>,
    pub image: Option<String>,
    pub notes: Option<String>,
    pub joining_date: Option<i64>,
}
