//! Booking Slot API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/booking-slots", get(handler::list_for_day))
}
