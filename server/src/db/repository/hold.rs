//! Hold Repository
//!
//! Status transitions are conditional updates guarded on the current
//! status, so a terminal hold can never be moved again even if two code
//! paths race.

use super::RepoResult;
use crate::db::models::Hold;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct HoldRepository {
    pool: SqlitePool,
}

impl HoldRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, hold_id: &str) -> RepoResult<Option<Hold>> {
        let hold = sqlx::query_as::<_, Hold>("SELECT * FROM holds WHERE hold_id = ?")
            .bind(hold_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(hold)
    }

    /// active -> released, if still active. Returns whether a row moved.
    pub async fn mark_released(&self, hold_id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE holds SET status = 'released' WHERE hold_id = ? AND status = 'active'",
        )
        .bind(hold_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lazy expiry for a single hold: active -> expired once past its TTL.
    pub async fn mark_expired_if_due(
        &self,
        hold_id: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE holds SET status = 'expired'
             WHERE hold_id = ? AND status = 'active' AND expires_at <= ?",
        )
        .bind(hold_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Janitor sweep: relabel every stale-active hold. Capacity math never
    /// depends on this; it only keeps the stored status honest.
    pub async fn expire_all_due(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            "UPDATE holds SET status = 'expired' WHERE status = 'active' AND expires_at <= ?",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ===== Transaction-scoped operations (inside a slot's critical section) =====

    pub async fn fetch(conn: &mut SqliteConnection, hold_id: &str) -> RepoResult<Option<Hold>> {
        let hold = sqlx::query_as::<_, Hold>("SELECT * FROM holds WHERE hold_id = ?")
            .bind(hold_id)
            .fetch_optional(conn)
            .await?;
        Ok(hold)
    }

    /// Total party size of active, unexpired holds against a slot
    pub async fn active_held_total(
        conn: &mut SqliteConnection,
        slot_id: i64,
        now: DateTime<Utc>,
    ) -> RepoResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(party_size), 0) FROM holds
             WHERE slot_id = ? AND status = 'active' AND expires_at > ?",
        )
        .bind(slot_id)
        .bind(now)
        .fetch_one(conn)
        .await?;
        Ok(total)
    }

    pub async fn insert(conn: &mut SqliteConnection, hold: &Hold) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO holds
             (hold_id, slot_id, party_size, contact, status, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&hold.hold_id)
        .bind(hold.slot_id)
        .bind(hold.party_size)
        .bind(hold.contact.clone())
        .bind(hold.status)
        .bind(hold.expires_at)
        .bind(hold.created_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// active -> confirmed, rewriting the contact bag (with the booking id)
    /// in the same statement. Returns whether the row moved.
    pub async fn mark_confirmed(
        conn: &mut SqliteConnection,
        hold_id: &str,
        contact: &serde_json::Value,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE holds SET status = 'confirmed', contact = ?
             WHERE hold_id = ? AND status = 'active'",
        )
        .bind(Json(contact.clone()))
        .bind(hold_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// active -> expired, used when confirm races with expiry
    pub async fn mark_expired(conn: &mut SqliteConnection, hold_id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE holds SET status = 'expired' WHERE hold_id = ? AND status = 'active'",
        )
        .bind(hold_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
