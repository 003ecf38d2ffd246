//! Database models
//!
//! One file per table: serde + sqlx row types plus Create payloads.

pub mod booking;
pub mod hold;
pub mod offer;
pub mod restaurant;
pub mod slot;

pub use booking::{Booking, BookingCreate, BookingStatus};
pub use hold::{Hold, HoldStatus};
pub use offer::{Offer, OfferCreate, OfferTimeSlot, OfferTimeSlotCreate, OfferType};
pub use restaurant::{Restaurant, RestaurantCreate};
pub use slot::{Slot, SlotCreate, SlotStatus};

pub(crate) fn default_true() -> bool {
    true
}
