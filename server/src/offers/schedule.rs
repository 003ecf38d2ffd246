//! Bulk offer schedule generation
//!
//! Admin tooling: creates one offer per requested hour across a date
//! range, each carrying half-hour time-slot rules, so the discount
//! resolver has something to materialize slots from.

use super::OfferError;
use crate::db::models::{OfferCreate, OfferTimeSlotCreate, OfferType};
use crate::db::repository::{OfferRepository, RestaurantRepository};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SlotPattern {
    /// Minute offset within the hour; only :00 and :30 are meaningful
    pub minute: u32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percentage: Option<f64>,
    #[validate(range(min = 0.0))]
    pub discount_amount: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleRequest {
    pub restaurant: i64,
    pub offer_type: OfferType,
    /// `{hour}` is replaced with the offer's hour
    #[validate(length(min = 1))]
    pub title_template: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours: Vec<u32>,
    #[validate(nested)]
    pub slots_pattern: Vec<SlotPattern>,
    #[serde(default)]
    pub replace: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub available_quantity: i64,
    pub original_price: Option<f64>,
    pub days_of_week: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub offers_created: u64,
    pub time_slots_created: u64,
    pub replaced: u64,
}

#[derive(Clone)]
pub struct ScheduleGenerator {
    pool: SqlitePool,
}

impl ScheduleGenerator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn generate(&self, req: &ScheduleRequest) -> Result<ScheduleSummary, OfferError> {
        req.validate()
            .map_err(|e| OfferError::Validation(e.to_string()))?;
        if req.end_date < req.start_date {
            return Err(OfferError::Validation(
                "end_date must not precede start_date".into(),
            ));
        }
        if req.hours.is_empty() {
            return Err(OfferError::Validation("hours must not be empty".into()));
        }
        for &hour in &req.hours {
            if hour > 23 {
                return Err(OfferError::Validation(format!("invalid hour {hour}")));
            }
        }
        for pattern in &req.slots_pattern {
            if pattern.minute != 0 && pattern.minute != 30 {
                return Err(OfferError::Validation(format!(
                    "slot pattern minute must be 0 or 30, got {}",
                    pattern.minute
                )));
            }
        }

        let restaurants = RestaurantRepository::new(self.pool.clone());
        if restaurants.find_by_id(req.restaurant).await?.is_none() {
            return Err(OfferError::RestaurantNotFound(req.restaurant));
        }

        let repo = OfferRepository::new(self.pool.clone());

        let replaced = if req.replace {
            repo.deactivate_overlapping(req.restaurant, req.start_date, req.end_date)
                .await?
        } else {
            0
        };

        let mut offers_created = 0u64;
        let mut time_slots_created = 0u64;

        for &hour in &req.hours {
            let window_start = NaiveTime::from_hms_opt(hour, 0, 0)
                .ok_or_else(|| OfferError::Validation(format!("invalid hour {hour}")))?;
            // keep 23:00 offers inside the day
            let window_end = NaiveTime::from_hms_opt(hour, 59, 59).unwrap_or(window_start);

            let title = req.title_template.replace("{hour}", &hour.to_string());
            let offer = repo
                .create(&OfferCreate {
                    restaurant_id: req.restaurant,
                    title,
                    description: req.description.clone(),
                    offer_type: req.offer_type,
                    discount_percentage: None,
                    discount_amount: None,
                    original_price: req.original_price,
                    start_date: req.start_date,
                    end_date: req.end_date,
                    days_of_week: req.days_of_week.clone(),
                    start_time: Some(window_start),
                    end_time: Some(window_end),
                    available_quantity: req.available_quantity,
                    is_active: true,
                    is_featured: false,
                })
                .await?;
            offers_created += 1;

            for pattern in &req.slots_pattern {
                let start = NaiveTime::from_hms_opt(hour, pattern.minute, 0).ok_or_else(|| {
                    OfferError::Validation(format!("invalid time {hour}:{}", pattern.minute))
                })?;
                repo.create_time_slot(&OfferTimeSlotCreate {
                    offer_id: offer.id,
                    start_time: start,
                    end_time: start + Duration::minutes(30),
                    discount_percentage: pattern.discount_percentage,
                    discount_amount: pattern.discount_amount,
                    is_active: true,
                })
                .await?;
                time_slots_created += 1;
            }
        }

        tracing::info!(
            restaurant_id = req.restaurant,
            offers_created,
            time_slots_created,
            replaced,
            "Offer schedule generated"
        );

        Ok(ScheduleSummary {
            offers_created,
            time_slots_created,
            replaced,
        })
    }
}
