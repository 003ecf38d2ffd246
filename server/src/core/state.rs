//! Server state
//!
//! `ServerState` holds shared references to every service; it clones
//! cheaply (Arc-backed) and is the axum router state. No slot aggregate
//! is cached here: capacity is re-derived from persisted rows on every
//! check, inside the slot's lock.

use std::sync::Arc;

use crate::booking::{BookingConfirmer, HoldManager, SlotLocks};
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::offers::{DiscountResolver, ScheduleGenerator};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite-backed database service
    pub db: DbService,
    /// Per-slot critical sections
    pub slot_locks: Arc<SlotLocks>,
}

impl ServerState {
    /// Open the database and build the shared state
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db = DbService::new(&config.database_path)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        Ok(Self {
            config: config.clone(),
            db,
            slot_locks: Arc::new(SlotLocks::new()),
        })
    }

    /// Build state around an existing database (tests)
    pub fn with_db(config: Config, db: DbService) -> Self {
        Self {
            config,
            db,
            slot_locks: Arc::new(SlotLocks::new()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn hold_manager(&self) -> HoldManager {
        HoldManager::new(self.db.pool.clone(), self.slot_locks.clone())
    }

    pub fn booking_confirmer(&self) -> BookingConfirmer {
        BookingConfirmer::new(self.db.pool.clone(), self.slot_locks.clone())
    }

    pub fn discount_resolver(&self) -> DiscountResolver {
        DiscountResolver::new(self.db.pool.clone())
    }

    pub fn schedule_generator(&self) -> ScheduleGenerator {
        ScheduleGenerator::new(self.db.pool.clone())
    }
}
