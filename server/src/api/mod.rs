//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness and database check
//! - [`availability`] - capacity snapshot reads
//! - [`slots`] - per-restaurant slot listings
//! - [`bookings`] - hold and booking lifecycle
//! - [`offers`] - slot materialization and schedule tooling

pub mod availability;
pub mod bookings;
pub mod health;
pub mod offers;
pub mod slots;

// Re-export common types for handlers
pub use crate::common::{AppError, AppResponse, AppResult};
