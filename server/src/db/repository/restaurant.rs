//! Restaurant Repository
//!
//! The core only reads restaurants; creation exists for seeding and the
//! thin staff surface.

use super::{RepoError, RepoResult};
use crate::db::models::{Restaurant, RestaurantCreate};
use chrono::Utc;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct RestaurantRepository {
    pool: SqlitePool,
}

impl RestaurantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(restaurant)
    }

    pub async fn create(&self, data: &RestaurantCreate) -> RepoResult<Restaurant> {
        let result = sqlx::query(
            "INSERT INTO restaurants
             (name, address, phone_number, description, cuisine_type,
              opening_time, closing_time, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.phone_number)
        .bind(&data.description)
        .bind(&data.cuisine_type)
        .bind(data.opening_time)
        .bind(data.closing_time)
        .bind(data.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} vanished after insert")))
    }
}
