//! Tabled Server - restaurant marketplace booking engine
//!
//! # Architecture overview
//!
//! The core of the server is the booking-slot capacity subsystem:
//! computing remaining capacity, reserving it with a time-boxed hold,
//! and converting a hold into a durable booking without overselling a
//! slot under concurrent access.
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/      # config, state, HTTP server, background tasks
//! ├── api/       # HTTP routes and handlers
//! ├── booking/   # capacity math, holds, confirmation
//! ├── offers/    # discount resolution, slot materialization
//! ├── db/        # SQLite service, models, repositories
//! └── common/    # error envelope, logging
//! ```

pub mod api;
pub mod booking;
pub mod common;
pub mod core;
pub mod db;
pub mod offers;

// Re-export common types
pub use booking::{BookingConfirmer, BookingError, HoldManager};
pub use common::{AppError, AppResult, init_logger};
pub use core::{Config, Server, ServerState};
pub use offers::{DiscountResolver, OfferError, ScheduleGenerator};
