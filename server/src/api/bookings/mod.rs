//! Booking API module
//!
//! Hold lifecycle plus booking reads. Holds are the only write path into
//! a slot's capacity; confirm is the only way a booking appears.

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/holds", post(handler::create_hold))
        .route("/holds/{hold_id}", delete(handler::release_hold))
        .route("/confirm", post(handler::confirm))
        .route("/{id}", get(handler::get_by_id))
}
