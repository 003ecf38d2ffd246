//! Offer pricing: discount resolution, slot materialization and bulk
//! schedule generation

pub mod resolver;
pub mod schedule;

pub use resolver::{DiscountResolver, DiscountSource, ResolvedDiscount};
pub use schedule::{ScheduleGenerator, ScheduleRequest, ScheduleSummary};

use crate::common::AppError;
use crate::db::repository::RepoError;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfferError {
    #[error("restaurant {0} not found")]
    RestaurantNotFound(i64),

    #[error("no offer covers {date} {time} for restaurant {restaurant_id}")]
    NoOfferCoversTime {
        restaurant_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OfferError> for AppError {
    fn from(err: OfferError) -> Self {
        let msg = err.to_string();
        match err {
            OfferError::Repo(repo) => repo.into(),
            OfferError::RestaurantNotFound(_) => AppError::not_found(msg),
            OfferError::NoOfferCoversTime { .. } => AppError::conflict(msg),
            OfferError::Validation(_) => AppError::validation(msg),
        }
    }
}
