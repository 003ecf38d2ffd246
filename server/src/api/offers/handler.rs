//! Offer API Handlers

use axum::{Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::common::AppResult;
use crate::core::ServerState;
use crate::db::models::Slot;
use crate::offers::resolver::SlotDefaults;
use crate::offers::{ScheduleRequest, ScheduleSummary};

#[derive(Debug, Deserialize)]
pub struct MaterializeRequest {
    pub restaurant: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub capacity: Option<i64>,
    pub min_party_size: Option<i64>,
    pub max_party_size: Option<i64>,
}

/// POST /api/offers/materialize_slot - create the concrete slot behind
/// an offer window
///
/// Idempotent: an existing slot at the key comes back unchanged. Without
/// a covering offer the request fails with a conflict.
pub async fn materialize_slot(
    State(state): State<ServerState>,
    Json(payload): Json<MaterializeRequest>,
) -> AppResult<(StatusCode, Json<Slot>)> {
    let base = SlotDefaults::default();
    let defaults = SlotDefaults {
        capacity: payload.capacity.unwrap_or(base.capacity),
        min_party_size: payload.min_party_size.unwrap_or(base.min_party_size),
        max_party_size: payload.max_party_size.unwrap_or(base.max_party_size),
    };

    let slot = state
        .discount_resolver()
        .materialize_slot(payload.restaurant, payload.date, payload.time, defaults)
        .await?;

    Ok((StatusCode::CREATED, Json(slot)))
}

/// POST /api/offers/generate_schedule - bulk-create offers plus their
/// half-hour time-slot rules across a date range
pub async fn generate_schedule(
    State(state): State<ServerState>,
    Json(payload): Json<ScheduleRequest>,
) -> AppResult<Json<ScheduleSummary>> {
    let summary = state.schedule_generator().generate(&payload).await?;
    Ok(Json(summary))
}
