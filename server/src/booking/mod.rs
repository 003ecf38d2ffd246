//! Booking core: capacity arithmetic, holds and confirmation
//!
//! This is the only part of the server with real correctness hazards.
//! The invariant it upholds: for any slot with finite capacity C,
//! confirmed party total + active unexpired held total <= C, always.
//!
//! # Modules
//!
//! - [`capacity`] - pure remaining-capacity and effective-status math
//! - [`locks`] - per-slot critical sections
//! - [`holds`] - hold creation, release and expiry
//! - [`confirm`] - hold -> booking conversion
//! - [`availability`] - snapshot reads for the read-only endpoints

pub mod availability;
pub mod capacity;
pub mod confirm;
pub mod holds;
pub mod locks;

pub use availability::{SlotAvailability, restaurant_day_availability, slot_availability};
pub use capacity::{EffectiveStatus, RemainingCapacity, effective_status, remaining_capacity};
pub use confirm::BookingConfirmer;
pub use holds::{HOLD_TTL_MINUTES, HoldManager};
pub use locks::SlotLocks;

use crate::common::AppError;
use crate::db::models::HoldStatus;
use crate::db::repository::RepoError;
use thiserror::Error;

/// Booking domain errors. Capacity and lock violations are reported
/// synchronously to the caller, never queued or retried.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("slot {0} not found")]
    SlotNotFound(i64),

    #[error("slot {slot_id} is not open for booking ({status})")]
    SlotNotOpen {
        slot_id: i64,
        status: EffectiveStatus,
    },

    #[error("party size {party_size} is outside the allowed range {min}..={max}")]
    PartySizeOutOfRange {
        party_size: i64,
        min: i64,
        max: i64,
    },

    #[error("slot {slot_id} cannot fit a party of {party_size}")]
    CapacityExceeded { slot_id: i64, party_size: i64 },

    #[error("hold {0} not found")]
    HoldNotFound(String),

    #[error("hold {0} has expired")]
    HoldExpired(String),

    #[error("hold {hold_id} is not active ({status})")]
    HoldNotActive {
        hold_id: String,
        status: HoldStatus,
    },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let msg = err.to_string();
        match err {
            BookingError::Repo(repo) => repo.into(),
            BookingError::SlotNotFound(_) | BookingError::HoldNotFound(_) => {
                AppError::not_found(msg)
            }
            BookingError::SlotNotOpen { .. }
            | BookingError::CapacityExceeded { .. }
            | BookingError::HoldExpired(_)
            | BookingError::HoldNotActive { .. } => AppError::conflict(msg),
            BookingError::PartySizeOutOfRange { .. } => AppError::validation(msg),
        }
    }
}
