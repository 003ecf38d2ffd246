//! Restaurant Model
//!
//! The core booking logic only reads restaurants; curation lives elsewhere.

use super::default_true;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub cuisine_type: Option<String>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub cuisine_type: Option<String>,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
