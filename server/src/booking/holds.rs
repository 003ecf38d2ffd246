//! Hold Manager
//!
//! Creates, releases and expires time-boxed capacity reservations. All
//! capacity checks happen inside the slot's critical section against
//! freshly read sums; availability reads done earlier by the client are
//! only snapshots and carry no promise.

use super::{BookingError, SlotLocks, capacity};
use crate::db::models::{Hold, HoldStatus};
use crate::db::repository::{BookingRepository, HoldRepository, RepoError, SlotRepository};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use sqlx::types::Json;
use std::sync::Arc;
use uuid::Uuid;

/// Fixed TTL: a hold reserves capacity for this long while the diner
/// finishes checkout.
pub const HOLD_TTL_MINUTES: i64 = 10;

#[derive(Clone)]
pub struct HoldManager {
    pool: SqlitePool,
    locks: Arc<SlotLocks>,
}

impl HoldManager {
    pub fn new(pool: SqlitePool, locks: Arc<SlotLocks>) -> Self {
        Self { pool, locks }
    }

    /// Reserve capacity for a party. Checks run inside the slot's
    /// critical section: the slot must be effectively open, the party
    /// size within the slot's bounds, and the remaining capacity (after
    /// confirmed bookings and unexpired holds) large enough.
    pub async fn create_hold(
        &self,
        slot_id: i64,
        party_size: i64,
        contact: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<Hold, BookingError> {
        let _guard = self.locks.acquire(slot_id).await;

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let slot = SlotRepository::fetch(&mut *tx, slot_id)
            .await?
            .ok_or(BookingError::SlotNotFound(slot_id))?;

        let booked = BookingRepository::confirmed_party_total(&mut *tx, slot_id).await?;
        let held = HoldRepository::active_held_total(&mut *tx, slot_id, now).await?;

        let remaining = capacity::remaining_capacity(&slot, booked, held);
        let status = capacity::effective_status(&slot, remaining, now.naive_utc());
        if status != capacity::EffectiveStatus::Open {
            return Err(BookingError::SlotNotOpen { slot_id, status });
        }

        if party_size < slot.min_party_size || party_size > slot.max_party_size {
            return Err(BookingError::PartySizeOutOfRange {
                party_size,
                min: slot.min_party_size,
                max: slot.max_party_size,
            });
        }

        if !remaining.accepts(party_size) {
            return Err(BookingError::CapacityExceeded {
                slot_id,
                party_size,
            });
        }

        let hold = Hold {
            hold_id: Uuid::new_v4().simple().to_string(),
            slot_id,
            party_size,
            contact: Json(contact),
            status: HoldStatus::Active,
            expires_at: now + Duration::minutes(HOLD_TTL_MINUTES),
            created_at: now,
        };
        HoldRepository::insert(&mut *tx, &hold).await?;

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            hold_id = %hold.hold_id,
            slot_id,
            party_size,
            expires_at = %hold.expires_at,
            "Hold created"
        );
        Ok(hold)
    }

    /// Release a hold, freeing its capacity. Idempotent in effect: a hold
    /// already in a terminal state is left untouched.
    pub async fn release_hold(&self, hold_id: &str) -> Result<(), BookingError> {
        let repo = HoldRepository::new(self.pool.clone());
        let hold = repo
            .find_by_id(hold_id)
            .await?
            .ok_or_else(|| BookingError::HoldNotFound(hold_id.to_string()))?;

        if hold.status == HoldStatus::Active {
            // conditional update: a concurrent confirm/expire wins the race
            // and this release becomes a no-op
            let released = repo.mark_released(hold_id).await?;
            if released {
                tracing::info!(hold_id, slot_id = hold.slot_id, "Hold released");
            }
        }
        Ok(())
    }

    /// Lazy expiry at read sites: relabel the hold if its TTL has passed.
    /// Returns the hold as it now stands. Capacity math never needs this
    /// (expired-but-active holds are excluded by the sum queries); the
    /// relabel only keeps the stored status honest.
    pub async fn expire_if_needed(
        &self,
        hold: Hold,
        now: DateTime<Utc>,
    ) -> Result<Hold, BookingError> {
        if hold.status != HoldStatus::Active || hold.expires_at > now {
            return Ok(hold);
        }
        let repo = HoldRepository::new(self.pool.clone());
        repo.mark_expired_if_due(&hold.hold_id, now).await?;
        Ok(Hold {
            status: HoldStatus::Expired,
            ..hold
        })
    }

    /// Janitor sweep over all stale-active holds (observability only;
    /// overselling never depends on it running).
    pub async fn expire_due(&self, now: DateTime<Utc>) -> Result<u64, BookingError> {
        let repo = HoldRepository::new(self.pool.clone());
        let relabeled = repo.expire_all_due(now).await?;
        if relabeled > 0 {
            tracing::debug!(relabeled, "Expired stale holds");
        }
        Ok(relabeled)
    }
}
