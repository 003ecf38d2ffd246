//! Offer Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Offer, OfferCreate, OfferTimeSlot, OfferTimeSlotCreate};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use sqlx::types::Json;

#[derive(Clone)]
pub struct OfferRepository {
    pool: SqlitePool,
}

impl OfferRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Offer>> {
        let offer = sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(offer)
    }

    /// Active offers for a restaurant whose date range covers `date`.
    /// The weekday constraint is JSON and gets filtered in the caller.
    pub async fn find_active_covering(
        &self,
        restaurant_id: i64,
        date: NaiveDate,
    ) -> RepoResult<Vec<Offer>> {
        let offers = sqlx::query_as::<_, Offer>(
            "SELECT * FROM offers
             WHERE restaurant_id = ? AND is_active = 1
               AND start_date <= ? AND end_date >= ?
             ORDER BY id",
        )
        .bind(restaurant_id)
        .bind(date)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(offers)
    }

    /// Active half-hour rules for an offer, ordered by start time
    pub async fn active_time_slots(&self, offer_id: i64) -> RepoResult<Vec<OfferTimeSlot>> {
        let slots = sqlx::query_as::<_, OfferTimeSlot>(
            "SELECT * FROM offer_time_slots
             WHERE offer_id = ? AND is_active = 1
             ORDER BY start_time",
        )
        .bind(offer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    pub async fn create(&self, data: &OfferCreate) -> RepoResult<Offer> {
        let result = sqlx::query(
            "INSERT INTO offers
             (restaurant_id, title, description, offer_type,
              discount_percentage, discount_amount, original_price,
              start_date, end_date, days_of_week, start_time, end_time,
              available_quantity, is_active, is_featured, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(data.restaurant_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.offer_type)
        .bind(data.discount_percentage)
        .bind(data.discount_amount)
        .bind(data.original_price)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.days_of_week.clone().map(Json))
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.available_quantity)
        .bind(data.is_active)
        .bind(data.is_featured)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Offer {id} vanished after insert")))
    }

    /// Insert a half-hour rule. Collisions on (offer, start_time) surface
    /// as `RepoError::Duplicate`.
    pub async fn create_time_slot(&self, data: &OfferTimeSlotCreate) -> RepoResult<i64> {
        let result = sqlx::query(
            "INSERT INTO offer_time_slots
             (offer_id, start_time, end_time, discount_percentage, discount_amount, is_active)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(data.offer_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.discount_percentage)
        .bind(data.discount_amount)
        .bind(data.is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Deactivate active offers for a restaurant overlapping a date range
    /// (used by schedule generation with `replace = true`)
    pub async fn deactivate_overlapping(
        &self,
        restaurant_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepoResult<u64> {
        let result = sqlx::query(
            "UPDATE offers SET is_active = 0
             WHERE restaurant_id = ? AND is_active = 1
               AND NOT (end_date < ? OR start_date > ?)",
        )
        .bind(restaurant_id)
        .bind(start_date)
        .bind(end_date)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Janitor: offers past their end_date are deleted when nothing
    /// references them and deactivated otherwise.
    /// Returns (deactivated, deleted).
    pub async fn purge_expired(&self, today: NaiveDate) -> RepoResult<(u64, u64)> {
        let deactivated = sqlx::query(
            "UPDATE offers SET is_active = 0
             WHERE end_date < ? AND is_active = 1
               AND id IN (SELECT DISTINCT offer_id FROM bookings WHERE offer_id IS NOT NULL)",
        )
        .bind(today)
        .execute(&self.pool)
        .await?
        .rows_affected();

        let deleted = sqlx::query(
            "DELETE FROM offers
             WHERE end_date < ?
               AND id NOT IN (SELECT DISTINCT offer_id FROM bookings WHERE offer_id IS NOT NULL)",
        )
        .bind(today)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok((deactivated, deleted))
    }
}
