//! Booking Model

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    /// Nullable: anonymous/guest bookings carry no diner and are never
    /// assigned a default owner
    pub diner_id: Option<i64>,
    pub restaurant_id: i64,
    pub slot_id: Option<i64>,
    pub offer_id: Option<i64>,
    /// Short human-readable confirmation code
    pub code: String,
    /// When the diner plans to arrive
    pub booking_time: NaiveDateTime,
    pub party_size: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload used by the confirmer
#[derive(Debug, Clone)]
pub struct BookingCreate {
    pub diner_id: Option<i64>,
    pub restaurant_id: i64,
    pub slot_id: Option<i64>,
    pub offer_id: Option<i64>,
    pub code: String,
    pub booking_time: NaiveDateTime,
    pub party_size: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}
