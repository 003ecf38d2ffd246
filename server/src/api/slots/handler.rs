//! Booking Slot API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::booking::{SlotAvailability, availability};
use crate::common::AppResult;
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub restaurant: i64,
    pub date: NaiveDate,
}

/// GET /api/booking-slots - active slots for a restaurant on a date,
/// each annotated with remaining capacity and effective status
pub async fn list_for_day(
    State(state): State<ServerState>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<Vec<SlotAvailability>>> {
    let slots = availability::restaurant_day_availability(
        state.pool(),
        query.restaurant,
        query.date,
        Utc::now(),
    )
    .await?;
    Ok(Json(slots))
}
