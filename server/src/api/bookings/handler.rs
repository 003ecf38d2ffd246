//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::BookingError;
use crate::common::{AppError, AppResult};
use crate::core::ServerState;
use crate::db::models::Booking;
use crate::db::repository::{BookingRepository, SlotRepository};
use crate::offers::ResolvedDiscount;

#[derive(Debug, Deserialize)]
pub struct HoldRequest {
    pub slot_id: i64,
    pub party_size: i64,
    /// Opaque contact bag, stored as-is on the hold
    #[serde(default)]
    pub contact: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct HoldResponse {
    pub hold_id: String,
    pub expires_at: DateTime<Utc>,
    /// Resolved discount at hold time, if any applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<ResolvedDiscount>,
}

/// POST /api/bookings/holds - reserve capacity for checkout
pub async fn create_hold(
    State(state): State<ServerState>,
    Json(payload): Json<HoldRequest>,
) -> AppResult<(StatusCode, Json<HoldResponse>)> {
    let hold = state
        .hold_manager()
        .create_hold(payload.slot_id, payload.party_size, payload.contact, Utc::now())
        .await?;

    // Price the hold for display; failures here never void the reservation.
    let price = match SlotRepository::new(state.pool().clone())
        .find_by_id(hold.slot_id)
        .await
    {
        Ok(Some(slot)) => state
            .discount_resolver()
            .resolve_for_slot(&slot)
            .await
            .unwrap_or_default(),
        _ => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(HoldResponse {
            hold_id: hold.hold_id,
            expires_at: hold.expires_at,
            price,
        }),
    ))
}

/// DELETE /api/bookings/holds/:hold_id - release a hold
///
/// Always 204: releasing an unknown or already-settled hold is a no-op
/// from the caller's point of view.
pub async fn release_hold(
    State(state): State<ServerState>,
    Path(hold_id): Path<String>,
) -> AppResult<StatusCode> {
    match state.hold_manager().release_hold(&hold_id).await {
        Ok(()) | Err(BookingError::HoldNotFound(_)) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub hold_id: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub booking_id: i64,
    pub code: String,
    pub status: &'static str,
}

/// POST /api/bookings/confirm - convert a hold into a booking
pub async fn confirm(
    State(state): State<ServerState>,
    Json(payload): Json<ConfirmRequest>,
) -> AppResult<Json<ConfirmResponse>> {
    let booking = state
        .booking_confirmer()
        .confirm(&payload.hold_id, Utc::now())
        .await?;

    Ok(Json(ConfirmResponse {
        booking_id: booking.id,
        code: booking.code,
        status: "confirmed",
    }))
}

/// GET /api/bookings/:id - fetch a booking
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = BookingRepository::new(state.pool().clone())
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Booking {} not found", id)))?;
    Ok(Json(booking))
}
