//! Booking Confirmer
//!
//! Converts an active hold into a durable booking inside the same
//! critical section hold mutation uses. The hold transition and the
//! booking insert share one transaction: either both land or neither
//! does, so a failed confirm leaves the hold active and reclaimable.

use super::{BookingError, SlotLocks};
use crate::db::models::{Booking, BookingCreate, BookingStatus, HoldStatus};
use crate::db::repository::{BookingRepository, HoldRepository, RepoError, SlotRepository};
use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct BookingConfirmer {
    pool: SqlitePool,
    locks: Arc<SlotLocks>,
}

impl BookingConfirmer {
    pub fn new(pool: SqlitePool, locks: Arc<SlotLocks>) -> Self {
        Self { pool, locks }
    }

    /// Convert a hold into a confirmed booking.
    ///
    /// Safe to retry: a hold that already reached a terminal state fails
    /// with `HoldExpired`/`HoldNotActive` instead of producing a second
    /// booking, and a hold whose TTL passed is expired here rather than
    /// resurrected.
    pub async fn confirm(
        &self,
        hold_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        // Peek outside the lock to learn which slot to serialize on.
        let peek = HoldRepository::new(self.pool.clone())
            .find_by_id(hold_id)
            .await?
            .ok_or_else(|| BookingError::HoldNotFound(hold_id.to_string()))?;

        let _guard = self.locks.acquire(peek.slot_id).await;

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        // Re-read inside the critical section; the peek may be stale.
        let hold = HoldRepository::fetch(&mut *tx, hold_id)
            .await?
            .ok_or_else(|| BookingError::HoldNotFound(hold_id.to_string()))?;

        match hold.status {
            HoldStatus::Active if hold.expires_at <= now => {
                // The race with expiry resolves here: never resurrect.
                HoldRepository::mark_expired(&mut *tx, hold_id).await?;
                tx.commit().await.map_err(RepoError::from)?;
                return Err(BookingError::HoldExpired(hold_id.to_string()));
            }
            HoldStatus::Active => {}
            HoldStatus::Expired => {
                return Err(BookingError::HoldExpired(hold_id.to_string()));
            }
            status => {
                return Err(BookingError::HoldNotActive {
                    hold_id: hold_id.to_string(),
                    status,
                });
            }
        }

        let slot = SlotRepository::fetch(&mut *tx, hold.slot_id)
            .await?
            .ok_or(BookingError::SlotNotFound(hold.slot_id))?;

        let create = BookingCreate {
            diner_id: None,
            restaurant_id: slot.restaurant_id,
            slot_id: Some(slot.id),
            offer_id: None,
            code: generate_code(),
            booking_time: slot.start_instant(),
            party_size: hold.party_size,
            status: BookingStatus::Confirmed,
            created_at: now,
        };
        let booking_id = BookingRepository::insert(&mut *tx, &create).await?;

        // Write the booking id into the contact bag for traceability.
        let mut contact = hold.contact.0.clone();
        if let serde_json::Value::Object(map) = &mut contact {
            map.insert("booking_id".to_string(), serde_json::json!(booking_id));
        }
        let moved = HoldRepository::mark_confirmed(&mut *tx, hold_id, &contact).await?;
        if !moved {
            // Cannot happen while we hold the slot lock; fail loudly and
            // roll everything back rather than strand a booking.
            return Err(BookingError::HoldNotActive {
                hold_id: hold_id.to_string(),
                status: hold.status,
            });
        }

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            hold_id,
            booking_id,
            slot_id = slot.id,
            party_size = hold.party_size,
            "Hold confirmed into booking"
        );

        Ok(Booking {
            id: booking_id,
            diner_id: create.diner_id,
            restaurant_id: create.restaurant_id,
            slot_id: create.slot_id,
            offer_id: create.offer_id,
            code: create.code,
            booking_time: create.booking_time,
            party_size: create.party_size,
            status: create.status,
            created_at: create.created_at,
        })
    }
}

/// Short confirmation code shown to the diner. Ambiguous glyphs
/// (0/O, 1/I/L) are left out of the alphabet.
fn generate_code() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::generate_code;

    #[test]
    fn code_has_expected_shape() {
        let code = generate_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!code.contains('0') && !code.contains('O'));
    }
}
