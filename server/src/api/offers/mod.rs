//! Offer API module
//!
//! Admin-facing tooling around offers: on-demand slot materialization
//! and bulk schedule generation.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/offers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/materialize_slot", post(handler::materialize_slot))
        .route("/generate_schedule", post(handler::generate_schedule))
}
