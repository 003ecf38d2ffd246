//! Slot capacity arithmetic
//!
//! Pure functions only: callers pass in the booked/held sums they read
//! inside (or outside) the critical section, plus an explicit `now`.
//! Capacity is always re-derived from persisted rows, never cached.

use crate::db::models::{Slot, SlotStatus};
use chrono::{Duration, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// Remaining guest capacity of a slot.
///
/// `Unlimited` (capacity = 0) is a distinct value, not a large number:
/// it never reads as full and never compares against party sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingCapacity {
    Unlimited,
    Finite(i64),
}

impl RemainingCapacity {
    /// Whether a party of the given size still fits
    pub fn accepts(&self, party_size: i64) -> bool {
        match self {
            RemainingCapacity::Unlimited => true,
            RemainingCapacity::Finite(n) => *n >= party_size,
        }
    }

    /// Full means finite and nothing left; unlimited is never full
    pub fn is_full(&self) -> bool {
        matches!(self, RemainingCapacity::Finite(n) if *n <= 0)
    }
}

impl Serialize for RemainingCapacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RemainingCapacity::Unlimited => serializer.serialize_str("unlimited"),
            RemainingCapacity::Finite(n) => serializer.serialize_i64(*n),
        }
    }
}

/// Status of a slot as a diner sees it right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    Open,
    Closed,
    Full,
    Past,
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveStatus::Open => write!(f, "open"),
            EffectiveStatus::Closed => write!(f, "closed"),
            EffectiveStatus::Full => write!(f, "full"),
            EffectiveStatus::Past => write!(f, "past"),
        }
    }
}

/// Remaining capacity given the confirmed-booking and active-hold totals.
///
/// `held` must already exclude holds with `expires_at <= now` (lazy
/// expiry): the repository sum query filters them out, so a stale-active
/// hold never counts against capacity.
pub fn remaining_capacity(slot: &Slot, booked: i64, held: i64) -> RemainingCapacity {
    if slot.capacity == 0 {
        RemainingCapacity::Unlimited
    } else {
        RemainingCapacity::Finite((slot.capacity - booked - held).max(0))
    }
}

/// Effective status with terminal precedence:
/// closed (inactive/closed) > past > full > closed (lead time) > open.
pub fn effective_status(
    slot: &Slot,
    remaining: RemainingCapacity,
    now: NaiveDateTime,
) -> EffectiveStatus {
    if !slot.is_active || slot.status == SlotStatus::Closed {
        return EffectiveStatus::Closed;
    }
    let start = slot.start_instant();
    if start < now {
        return EffectiveStatus::Past;
    }
    if remaining.is_full() {
        return EffectiveStatus::Full;
    }
    if start - now < Duration::minutes(slot.lead_time_minutes) {
        return EffectiveStatus::Closed;
    }
    EffectiveStatus::Open
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn slot(capacity: i64) -> Slot {
        Slot {
            id: 1,
            restaurant_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            capacity,
            min_party_size: 1,
            max_party_size: 8,
            discount_percentage: None,
            lead_time_minutes: 60,
            status: SlotStatus::Open,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 9, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn finite_remaining_subtracts_booked_and_held() {
        let s = slot(10);
        assert_eq!(remaining_capacity(&s, 4, 3), RemainingCapacity::Finite(3));
    }

    #[test]
    fn remaining_floors_at_zero() {
        let s = slot(10);
        assert_eq!(remaining_capacity(&s, 8, 5), RemainingCapacity::Finite(0));
    }

    #[test]
    fn zero_capacity_is_unlimited_not_zero() {
        let s = slot(0);
        let remaining = remaining_capacity(&s, 500, 500);
        assert_eq!(remaining, RemainingCapacity::Unlimited);
        assert!(!remaining.is_full());
        assert!(remaining.accepts(1000));
    }

    #[test]
    fn full_when_nothing_left() {
        let s = slot(10);
        let remaining = remaining_capacity(&s, 8, 2);
        assert!(remaining.is_full());
        assert_eq!(effective_status(&s, remaining, at(12, 0)), EffectiveStatus::Full);
    }

    #[test]
    fn inactive_slot_is_closed_before_anything_else() {
        let mut s = slot(10);
        s.is_active = false;
        // precedence: closed beats past and full
        let status = effective_status(&s, RemainingCapacity::Finite(0), at(23, 0));
        assert_eq!(status, EffectiveStatus::Closed);
    }

    #[test]
    fn started_slot_is_past() {
        let s = slot(10);
        let status = effective_status(&s, RemainingCapacity::Finite(5), at(19, 1));
        assert_eq!(status, EffectiveStatus::Past);
    }

    #[test]
    fn lead_time_cutoff_closes_slot_with_capacity_left() {
        let s = slot(10); // lead_time 60, starts 19:00
        let status = effective_status(&s, RemainingCapacity::Finite(10), at(18, 30));
        assert_eq!(status, EffectiveStatus::Closed);
    }

    #[test]
    fn open_outside_lead_time() {
        let s = slot(10);
        let status = effective_status(&s, RemainingCapacity::Finite(10), at(17, 0));
        assert_eq!(status, EffectiveStatus::Open);
    }

    #[test]
    fn exactly_at_lead_time_boundary_is_still_open() {
        let s = slot(10); // 60 min notice, start 19:00
        let status = effective_status(&s, RemainingCapacity::Finite(10), at(18, 0));
        assert_eq!(status, EffectiveStatus::Open);
    }
}
