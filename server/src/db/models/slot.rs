//! Booking Slot Model
//!
//! A restaurant's bookable window, unique per (restaurant, date, start_time).
//! `capacity == 0` means unlimited guests.

use super::default_true;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored slot status. The *effective* status additionally accounts for
/// capacity, lead time and start instant; see `booking::capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SlotStatus {
    Open,
    Closed,
    Full,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Open => write!(f, "open"),
            SlotStatus::Closed => write!(f, "closed"),
            SlotStatus::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Slot {
    pub id: i64,
    pub restaurant_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Max total guests across the window; 0 = unlimited
    pub capacity: i64,
    pub min_party_size: i64,
    pub max_party_size: i64,
    pub discount_percentage: Option<f64>,
    /// Minimum minutes of notice required before start for the slot to
    /// remain bookable
    pub lead_time_minutes: i64,
    pub status: SlotStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    /// The slot's start instant in the marketplace timezone.
    pub fn start_instant(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }
}

/// Create slot payload (staff action or offer materialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotCreate {
    pub restaurant_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default = "default_min_party")]
    pub min_party_size: i64,
    #[serde(default = "default_max_party")]
    pub max_party_size: i64,
    pub discount_percentage: Option<f64>,
    #[serde(default = "default_lead_time")]
    pub lead_time_minutes: i64,
    #[serde(default = "default_open")]
    pub status: SlotStatus,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_min_party() -> i64 {
    1
}

fn default_max_party() -> i64 {
    20
}

fn default_lead_time() -> i64 {
    60
}

fn default_open() -> SlotStatus {
    SlotStatus::Open
}
