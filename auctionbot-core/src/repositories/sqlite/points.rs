// src/repositories/sqlite/points.rs

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use auctionbot_common::traits::repository_traits::PointsLedger;
use crate::Error;

/// Balances live on the `users` row; a CHECK constraint keeps them non-negative.
#[derive(Clone)]
pub struct SqlitePointsLedger {
    pool: Pool<Sqlite>,
}

impl SqlitePointsLedger {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

fn ensure_positive(amount: i64) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::Parse(format!("point amount must be positive, got {}", amount)));
    }
    Ok(())
}

#[async_trait]
impl PointsLedger for SqlitePointsLedger {
    async fn balance(&self, user_id: i64) -> Result<i64, Error> {
        let row = sqlx::query("SELECT points FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(r.try_get("points")?),
            None => Ok(0),
        }
    }

    async fn credit(&self, user_id: i64, amount: i64) -> Result<(), Error> {
        ensure_positive(amount)?;
        let result = sqlx::query("UPDATE users SET points = points + ? WHERE user_id = ?")
            .bind(amount)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("No user with id={}", user_id)));
        }
        Ok(())
    }

    async fn debit(&self, user_id: i64, amount: i64) -> Result<bool, Error> {
        ensure_positive(amount)?;
        let result = sqlx::query(
            r#"
            UPDATE users
            SET points = points - ?
            WHERE user_id = ? AND points >= ?
            "#,
        )
        .bind(amount)
        .bind(user_id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
