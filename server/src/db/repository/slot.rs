//! Slot Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Slot, SlotCreate};
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct SlotRepository {
    pool: SqlitePool,
}

impl SlotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find slot by id (snapshot read, outside any critical section)
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(slot)
    }

    /// Find the slot at an exact (restaurant, date, start_time) key
    pub async fn find_at(
        &self,
        restaurant_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> RepoResult<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE restaurant_id = ? AND date = ? AND start_time = ?",
        )
        .bind(restaurant_id)
        .bind(date)
        .bind(start_time)
        .fetch_optional(&self.pool)
        .await?;
        Ok(slot)
    }

    /// All active slots for a restaurant on a date, ordered by start time
    pub async fn find_for_day(
        &self,
        restaurant_id: i64,
        date: NaiveDate,
    ) -> RepoResult<Vec<Slot>> {
        let slots = sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots
             WHERE restaurant_id = ? AND date = ? AND is_active = 1
             ORDER BY start_time",
        )
        .bind(restaurant_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    /// Insert a new slot. A unique-key collision on
    /// (restaurant, date, start_time) surfaces as `RepoError::Duplicate`.
    pub async fn create(&self, data: &SlotCreate) -> RepoResult<Slot> {
        let result = sqlx::query(
            "INSERT INTO slots
             (restaurant_id, date, start_time, end_time, capacity,
              min_party_size, max_party_size, discount_percentage,
              lead_time_minutes, status, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(data.restaurant_id)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.capacity)
        .bind(data.min_party_size)
        .bind(data.max_party_size)
        .bind(data.discount_percentage)
        .bind(data.lead_time_minutes)
        .bind(data.status)
        .bind(data.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Slot {id} vanished after insert")))
    }

    /// Transaction-scoped fetch, used inside a slot's critical section
    pub async fn fetch(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(slot)
    }
}
