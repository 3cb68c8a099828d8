// src/repositories/sqlite/claims.rs

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite, SqliteConnection};

use auctionbot_common::models::{Claim, ClaimOutcome};
use auctionbot_common::traits::repository_traits::ClaimRepository;
use crate::utils::time::{current_epoch, from_epoch};
use crate::Error;

/// Claims and their reward credit are written in one transaction. Every transaction here opens
/// with a write, so it holds the write lock from its first statement.
#[derive(Clone)]
pub struct SqliteClaimRepository {
    pool: Pool<Sqlite>,
}

impl SqliteClaimRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

pub(crate) async fn count_claims(conn: &mut SqliteConnection, item_id: i64) -> Result<i64, Error> {
    let row = sqlx::query("SELECT COUNT(*) AS cnt FROM claims WHERE item_id = ?")
        .bind(item_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.try_get("cnt")?)
}

/// Inserts the claim only while the item is below `cap`. Returns whether a row was written.
pub(crate) async fn insert_claim_capped(
    conn: &mut SqliteConnection,
    user_id: i64,
    item_id: i64,
    cap: i64,
) -> Result<bool, Error> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO claims (user_id, item_id, claimed_at)
        SELECT ?, ?, ?
        WHERE (SELECT COUNT(*) FROM claims WHERE item_id = ?) < ?
        "#,
    )
    .bind(user_id)
    .bind(item_id)
    .bind(current_epoch())
    .bind(item_id)
    .bind(cap)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Adds `amount` to the user's balance; an unknown user is `NotFound`.
pub(crate) async fn credit_points(
    conn: &mut SqliteConnection,
    user_id: i64,
    amount: i64,
) -> Result<(), Error> {
    let result = sqlx::query("UPDATE users SET points = points + ? WHERE user_id = ?")
        .bind(amount)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("No user with id={}", user_id)));
    }
    Ok(())
}

#[async_trait]
impl ClaimRepository for SqliteClaimRepository {
    async fn claim_count(&self, item_id: i64) -> Result<i64, Error> {
        let mut conn = self.pool.acquire().await?;
        count_claims(&mut conn, item_id).await
    }

    async fn attempt_claim(&self, user_id: i64, item_id: i64, reward: i64) -> Result<ClaimOutcome, Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO claims (user_id, item_id, claimed_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(current_epoch())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(ClaimOutcome::AlreadyClaimed);
        }

        credit_points(&mut tx, user_id, reward).await?;
        tx.commit().await?;
        Ok(ClaimOutcome::Won { reward })
    }

    async fn attempt_claim_capped(
        &self,
        user_id: i64,
        item_id: i64,
        reward: i64,
        cap: i64,
    ) -> Result<ClaimOutcome, Error> {
        let mut tx = self.pool.begin().await?;

        // Re-offer items are won only through a paid entry with their own single-winner cap.
        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO claims (user_id, item_id, claimed_at)
            SELECT ?, ?, ?
            WHERE (SELECT COUNT(*) FROM claims WHERE item_id = ?) < ?
              AND NOT EXISTS (SELECT 1 FROM re_offers WHERE item_id = ?)
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(current_epoch())
        .bind(item_id)
        .bind(cap)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            let is_re_offer = sqlx::query("SELECT 1 AS present FROM re_offers WHERE item_id = ?")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?
                .is_some();
            if is_re_offer {
                return Ok(ClaimOutcome::CapReached);
            }
            // Cap takes precedence over a duplicate.
            let count = count_claims(&mut tx, item_id).await?;
            return Ok(if count >= cap {
                ClaimOutcome::CapReached
            } else {
                ClaimOutcome::AlreadyClaimed
            });
        }

        credit_points(&mut tx, user_id, reward).await?;
        tx.commit().await?;
        Ok(ClaimOutcome::Won { reward })
    }

    async fn claimed_images_for(&self, user_id: i64) -> Result<Vec<String>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT i.image
            FROM claims c
            JOIN items i ON i.item_id = c.item_id
            WHERE c.user_id = ?
            ORDER BY c.claimed_at, c.item_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut images = Vec::with_capacity(rows.len());
        for r in rows {
            images.push(r.try_get("image")?);
        }
        Ok(images)
    }

    async fn claims_for_item(&self, item_id: i64) -> Result<Vec<Claim>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, item_id, claimed_at
            FROM claims
            WHERE item_id = ?
            ORDER BY claimed_at, user_id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push(Claim {
                user_id: r.try_get("user_id")?,
                item_id: r.try_get("item_id")?,
                claimed_at: from_epoch(r.try_get::<i64, _>("claimed_at")?),
            });
        }
        Ok(out)
    }
}
