//! Snapshot availability reads
//!
//! These run outside any critical section and may be stale by the time a
//! hold is attempted; correctness rests on the in-lock check in
//! `HoldManager`, not on these reads being fresh.

use super::{BookingError, EffectiveStatus, RemainingCapacity, capacity};
use crate::db::models::Slot;
use crate::db::repository::{BookingRepository, HoldRepository, RepoError, SlotRepository};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

/// A slot annotated with its computed remaining capacity and status
#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    #[serde(flatten)]
    pub slot: Slot,
    pub remaining: RemainingCapacity,
    pub effective_status: EffectiveStatus,
}

impl SlotAvailability {
    /// Whether a party of the given size could be held right now
    pub fn accepts(&self, party_size: i64) -> bool {
        self.effective_status == EffectiveStatus::Open
            && self.remaining.accepts(party_size)
            && party_size >= self.slot.min_party_size
            && party_size <= self.slot.max_party_size
    }
}

async fn annotate(
    pool: &SqlitePool,
    slot: Slot,
    now: DateTime<Utc>,
) -> Result<SlotAvailability, BookingError> {
    let mut conn = pool.acquire().await.map_err(RepoError::from)?;
    let booked = BookingRepository::confirmed_party_total(&mut conn, slot.id).await?;
    let held = HoldRepository::active_held_total(&mut conn, slot.id, now).await?;

    let remaining = capacity::remaining_capacity(&slot, booked, held);
    let effective_status = capacity::effective_status(&slot, remaining, now.naive_utc());
    Ok(SlotAvailability {
        slot,
        remaining,
        effective_status,
    })
}

/// Availability snapshot for one slot
pub async fn slot_availability(
    pool: &SqlitePool,
    slot_id: i64,
    now: DateTime<Utc>,
) -> Result<SlotAvailability, BookingError> {
    let slot = SlotRepository::new(pool.clone())
        .find_by_id(slot_id)
        .await?
        .ok_or(BookingError::SlotNotFound(slot_id))?;
    annotate(pool, slot, now).await
}

/// Availability snapshots for every active slot of a restaurant on a date
pub async fn restaurant_day_availability(
    pool: &SqlitePool,
    restaurant_id: i64,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Vec<SlotAvailability>, BookingError> {
    let slots = SlotRepository::new(pool.clone())
        .find_for_day(restaurant_id, date)
        .await?;

    let mut out = Vec::with_capacity(slots.len());
    for slot in slots {
        out.push(annotate(pool, slot, now).await?);
    }
    Ok(out)
}
