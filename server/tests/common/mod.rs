//! Shared test fixtures: tempfile-backed database plus seed helpers

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use tabled_server::core::{Config, ServerState};
use tabled_server::db::DbService;
use tabled_server::db::models::{RestaurantCreate, Slot, SlotCreate, SlotStatus};
use tabled_server::db::repository::{RestaurantRepository, SlotRepository};
use tempfile::TempDir;

pub struct TestEnv {
    pub state: ServerState,
    // dropping the dir deletes the database file
    _dir: TempDir,
}

fn test_config(work_dir: &str, database_path: &str) -> Config {
    Config {
        work_dir: work_dir.to_string(),
        database_path: database_path.to_string(),
        http_port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        hold_janitor_interval_secs: 60,
        offer_purge_interval_secs: 3600,
    }
}

pub async fn setup() -> TestEnv {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("test.db");
    let db_path = db_path.to_str().expect("utf-8 path");

    let db = DbService::new(db_path).await.expect("open test database");
    let config = test_config(dir.path().to_str().expect("utf-8 path"), db_path);

    TestEnv {
        state: ServerState::with_db(config, db),
        _dir: dir,
    }
}

pub async fn seed_restaurant(env: &TestEnv) -> i64 {
    RestaurantRepository::new(env.state.pool().clone())
        .create(&RestaurantCreate {
            name: "Trattoria Test".to_string(),
            address: "1 Via Roma".to_string(),
            phone_number: None,
            description: None,
            cuisine_type: Some("italian".to_string()),
            opening_time: None,
            closing_time: None,
            is_active: true,
        })
        .await
        .expect("seed restaurant")
        .id
}

/// A date comfortably in the future, so lead-time checks pass
pub fn future_date() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(7)
}

pub fn dinner_time() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).expect("valid time")
}

/// Seed an open slot a week out (18:00, 60 min lead time)
pub async fn seed_slot(
    env: &TestEnv,
    restaurant_id: i64,
    capacity: i64,
    min_party_size: i64,
    max_party_size: i64,
) -> Slot {
    SlotRepository::new(env.state.pool().clone())
        .create(&SlotCreate {
            restaurant_id,
            date: future_date(),
            start_time: dinner_time(),
            end_time: dinner_time() + Duration::minutes(30),
            capacity,
            min_party_size,
            max_party_size,
            discount_percentage: None,
            lead_time_minutes: 60,
            status: SlotStatus::Open,
            is_active: true,
        })
        .await
        .expect("seed slot")
}
