//! Availability API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::booking::{RemainingCapacity, availability};
use crate::common::AppResult;
use crate::core::ServerState;

/// Legacy wire sentinel for an unlimited slot
const UNLIMITED_SENTINEL: i64 = 99;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub slot_id: i64,
    pub party_size: i64,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub remaining: i64,
}

/// GET /api/availability - snapshot capacity check for one slot
///
/// The answer is advisory: capacity is only promised once a hold is
/// created. Unlimited capacity is reported as 99 on the wire.
pub async fn check(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let snapshot = availability::slot_availability(state.pool(), query.slot_id, Utc::now()).await?;

    let remaining = match snapshot.remaining {
        RemainingCapacity::Unlimited => UNLIMITED_SENTINEL,
        RemainingCapacity::Finite(n) => n,
    };

    Ok(Json(AvailabilityResponse {
        available: snapshot.accepts(query.party_size),
        remaining,
    }))
}
