//! Offer and OfferTimeSlot Models
//!
//! An offer is a discount campaign over a date range; half-hour
//! OfferTimeSlot rules refine the discount per time of day.

use super::default_true;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OfferType {
    Percentage,
    Amount,
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferType::Percentage => write!(f, "percentage"),
            OfferType::Amount => write!(f, "amount"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Offer {
    pub id: i64,
    pub restaurant_id: i64,
    pub title: String,
    pub description: String,
    pub offer_type: OfferType,
    pub discount_percentage: Option<f64>,
    pub discount_amount: Option<f64>,
    /// Reference price for converting a fixed amount into a percentage;
    /// amount-only offers without it are not convertible
    pub original_price: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Weekday numbers (0 = Monday .. 6 = Sunday); None = every day
    pub days_of_week: Option<Json<Vec<u8>>>,
    /// Coarse daily window; half-hour time-slot rules take precedence
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub available_quantity: i64,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    /// Whether the offer's weekday constraint admits `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match &self.days_of_week {
            None => true,
            Some(days) => {
                let weekday = date.weekday().num_days_from_monday() as u8;
                days.0.contains(&weekday)
            }
        }
    }

    /// Whether the coarse daily window covers `time`.
    pub fn covers_time(&self, time: NaiveTime) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => start <= time && time < end,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OfferTimeSlot {
    pub id: i64,
    pub offer_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub discount_percentage: Option<f64>,
    pub discount_amount: Option<f64>,
    pub is_active: bool,
}

impl OfferTimeSlot {
    /// Half-hour rules match a time when it falls inside their window.
    pub fn covers_time(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time < self.end_time
    }
}

/// Create offer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferCreate {
    pub restaurant_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub offer_type: OfferType,
    pub discount_percentage: Option<f64>,
    pub discount_amount: Option<f64>,
    pub original_price: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_week: Option<Vec<u8>>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub available_quantity: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

/// Create half-hour rule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferTimeSlotCreate {
    pub offer_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub discount_percentage: Option<f64>,
    pub discount_amount: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
