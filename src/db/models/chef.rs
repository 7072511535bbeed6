//! Chef Model (厨师名录)

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use super::staff::Weekday;

pub type ChefId = RecordId;

/// 厨师专长
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Specialization {
    #[serde(rename = "Head Chef")]
    HeadChef,
    #[serde(rename = "Sous Chef")]
    SousChef,
    #[serde(rename = "Pastry Chef")]
    PastryChef,
    #[serde(rename = "Grill Chef")]
    GrillChef,
    #[serde(rename = "Prep Chef")]
    PrepChef,
    Other,
}

/// 厨师单日可用性
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChefAvailability {
    pub day: Weekday,
    pub status: String,
}

/// Chef directory entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chef {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ChefId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<Specialization>,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub availability: Vec<ChefAvailability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Stored upload filename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct ChefCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub specialization: Option<Specialization>,
    pub experience_years: Option<i32>,
    pub availability: Option<Vec<ChefAvailability>>,
    pub notes: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChefUpdate {
    pub name: Option<String>,
    pub specialization: Option<Specialization>,
    pub experience_years: Option<i32>,
    pub availability: Option<Vec<ChefAvailability>>,
    pub notes: Option<String>,
    /// Some(new) 替换头像；删除旧文件由 handler 负责
    pub profile_picture: Option<String>,
    /// true 时移除当前头像
    pub remove_picture: Option<bool>,
}
