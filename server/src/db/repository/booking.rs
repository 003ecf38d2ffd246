//! Booking Repository

use super::RepoResult;
use crate::db::models::{Booking, BookingCreate};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    /// Bookings referencing a slot, newest first
    pub async fn find_for_slot(&self, slot_id: i64) -> RepoResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE slot_id = ? ORDER BY created_at DESC",
        )
        .bind(slot_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    // ===== Transaction-scoped operations (inside a slot's critical section) =====

    /// Total party size of confirmed bookings referencing a slot
    pub async fn confirmed_party_total(
        conn: &mut SqliteConnection,
        slot_id: i64,
    ) -> RepoResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(party_size), 0) FROM bookings
             WHERE slot_id = ? AND status = 'confirmed'",
        )
        .bind(slot_id)
        .fetch_one(conn)
        .await?;
        Ok(total)
    }

    /// Insert a booking and return its id
    pub async fn insert(conn: &mut SqliteConnection, data: &BookingCreate) -> RepoResult<i64> {
        let result = sqlx::query(
            "INSERT INTO bookings
             (diner_id, restaurant_id, slot_id, offer_id, code,
              booking_time, party_size, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(data.diner_id)
        .bind(data.restaurant_id)
        .bind(data.slot_id)
        .bind(data.offer_id)
        .bind(&data.code)
        .bind(data.booking_time)
        .bind(data.party_size)
        .bind(data.status)
        .bind(data.created_at)
        .execute(conn)
        .await?;
        Ok(result.last_insert_rowid())
    }
}
