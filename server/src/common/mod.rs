//! Shared infrastructure: error envelope and logging

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult, ok};
pub use logger::init_logger;
