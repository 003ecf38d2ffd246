//! Booking Hold Model
//!
//! A short-lived capacity claim while a diner finishes checkout. Holds
//! reserve capacity via data, not by blocking other requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::fmt;

/// Hold lifecycle. `active` is the only non-terminal state; exactly one
/// terminal transition ever happens and nothing leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum HoldStatus {
    Active,
    Released,
    Confirmed,
    Expired,
}

impl fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldStatus::Active => write!(f, "active"),
            HoldStatus::Released => write!(f, "released"),
            HoldStatus::Confirmed => write!(f, "confirmed"),
            HoldStatus::Expired => write!(f, "expired"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hold {
    /// Opaque random URL-safe token, primary key
    pub hold_id: String,
    pub slot_id: i64,
    pub party_size: i64,
    /// Opaque key-value bag supplied by the client; the confirmed booking
    /// id is written back here for traceability
    pub contact: Json<serde_json::Value>,
    pub status: HoldStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Hold {
    /// Whether this hold still counts against slot capacity at `now`.
    pub fn counts_at(&self, now: DateTime<Utc>) -> bool {
        self.status == HoldStatus::Active && self.expires_at > now
    }
}
