// src/repositories/sqlite/user.rs

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use auctionbot_common::models::{RatingEntry, User};
use auctionbot_common::traits::repository_traits::UserRepository;
use crate::utils::time::{current_epoch, from_epoch};
use crate::Error;

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: Pool<Sqlite>,
}

impl SqliteUserRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn register(&self, user_id: i64, user_name: Option<&str>) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (user_id, user_name, points, is_admin, registered_at)
            VALUES (?, ?, 0, 0, ?)
            "#,
        )
        .bind(user_id)
        .bind(user_name)
        .bind(current_epoch())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get(&self, user_id: i64) -> Result<Option<User>, Error> {
        let row = sqlx::query(
            r#"
            SELECT user_id, user_name, points, is_admin, registered_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(r) = row {
            Ok(Some(User {
                user_id: r.try_get("user_id")?,
                user_name: r.try_get("user_name")?,
                points: r.try_get("points")?,
                is_admin: r.try_get("is_admin")?,
                registered_at: from_epoch(r.try_get::<i64, _>("registered_at")?),
            }))
        } else {
            Ok(None)
        }
    }

    async fn list_ids(&self) -> Result<Vec<i64>, Error> {
        let rows = sqlx::query("SELECT user_id FROM users ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;

        let mut ids = Vec::with_capacity(rows.len());
        for r in rows {
            ids.push(r.try_get("user_id")?);
        }
        Ok(ids)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, Error> {
        let row = sqlx::query("SELECT is_admin FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(r.try_get("is_admin")?),
            None => Ok(false),
        }
    }

    async fn set_admin(&self, user_id: i64) -> Result<(), Error> {
        let result = sqlx::query("UPDATE users SET is_admin = 1 WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("No user with id={}", user_id)));
        }
        Ok(())
    }

    async fn rating(&self, limit: i64) -> Result<Vec<RatingEntry>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT u.user_id, u.user_name, u.points, COUNT(c.item_id) AS claims
            FROM users u
            JOIN claims c ON c.user_id = u.user_id
            GROUP BY u.user_id, u.user_name, u.points
            ORDER BY claims DESC, u.points DESC, u.user_id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push(RatingEntry {
                user_id: r.try_get("user_id")?,
                user_name: r.try_get("user_name")?,
                claims: r.try_get("claims")?,
                points: r.try_get("points")?,
            });
        }
        Ok(out)
    }
}
