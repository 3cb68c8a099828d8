// src/repositories/sqlite/re_offer.rs

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

use auctionbot_common::models::{ReOffer, ReOfferEntryOutcome};
use auctionbot_common::traits::repository_traits::ReOfferRepository;
use crate::repositories::sqlite::claims::{count_claims, credit_points, insert_claim_capped};
use crate::utils::time::{from_epoch, to_epoch};
use crate::Error;

/// A re-offer has exactly one winner.
const RE_OFFER_WINNERS: i64 = 1;

#[derive(Clone)]
pub struct SqliteReOfferRepository {
    pool: Pool<Sqlite>,
}

impl SqliteReOfferRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn row_to_re_offer(r: &SqliteRow) -> Result<ReOffer, Error> {
        Ok(ReOffer {
            item_id: r.try_get("item_id")?,
            original_item_id: r.try_get("original_item_id")?,
            start_at: from_epoch(r.try_get::<i64, _>("start_at")?),
            end_at: from_epoch(r.try_get::<i64, _>("end_at")?),
            cost: r.try_get("cost")?,
        })
    }
}

#[async_trait]
impl ReOfferRepository for SqliteReOfferRepository {
    async fn open(
        &self,
        original_item_id: i64,
        cap: i64,
        cost: i64,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<ReOffer>, Error> {
        let start = to_epoch(now);
        let end = to_epoch(now + duration);
        let mut tx = self.pool.begin().await?;

        // Clone the image into a fresh item, but only while the original is under its cap.
        let cloned = sqlx::query(
            r#"
            INSERT INTO items (image, consumed, added_by, added_at)
            SELECT image, 0, NULL, ?
            FROM items
            WHERE item_id = ?
              AND (SELECT COUNT(*) FROM claims WHERE item_id = ?) < ?
            "#,
        )
        .bind(start)
        .bind(original_item_id)
        .bind(original_item_id)
        .bind(cap)
        .execute(&mut *tx)
        .await?;

        if cloned.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 AS present FROM items WHERE item_id = ?")
                .bind(original_item_id)
                .fetch_optional(&mut *tx)
                .await?
                .is_some();
            if !exists {
                return Err(Error::NotFound(format!("No item with id={}", original_item_id)));
            }
            debug!("item {} is at its cap; no re-offer opened", original_item_id);
            return Ok(None);
        }

        let item_id = cloned.last_insert_rowid();
        sqlx::query(
            r#"
            INSERT INTO re_offers (item_id, original_item_id, start_at, end_at, cost)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(item_id)
        .bind(original_item_id)
        .bind(start)
        .bind(end)
        .bind(cost)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(ReOffer {
            item_id,
            original_item_id,
            start_at: from_epoch(start),
            end_at: from_epoch(end),
            cost,
        }))
    }

    async fn get(&self, item_id: i64) -> Result<Option<ReOffer>, Error> {
        let row = sqlx::query(
            r#"
            SELECT item_id, original_item_id, start_at, end_at, cost
            FROM re_offers
            WHERE item_id = ?
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_re_offer).transpose()
    }

    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<ReOffer>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, original_item_id, start_at, end_at, cost
            FROM re_offers
            WHERE end_at > ?
            ORDER BY end_at, item_id
            "#,
        )
        .bind(to_epoch(now))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_re_offer).collect()
    }

    async fn enter(
        &self,
        user_id: i64,
        item_id: i64,
        reward: i64,
        now: DateTime<Utc>,
    ) -> Result<ReOfferEntryOutcome, Error> {
        // 1) Eligibility, in the order users are told about it.
        let re_offer = self
            .get(item_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No re-offer for item id={}", item_id)))?;

        if !re_offer.is_active_at(now) {
            return Ok(ReOfferEntryOutcome::Expired);
        }

        let available: i64 = sqlx::query("SELECT points FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|r| r.try_get::<i64, _>("points"))
            .transpose()?
            .unwrap_or(0);

        if available < re_offer.cost {
            return Ok(ReOfferEntryOutcome::InsufficientBalance {
                required: re_offer.cost,
                available,
            });
        }

        {
            let mut conn = self.pool.acquire().await?;
            if count_claims(&mut conn, item_id).await? >= RE_OFFER_WINNERS {
                return Ok(ReOfferEntryOutcome::CapReached);
            }
        }

        // 2) Debit, claim and reward commit together. Any early return drops `tx`,
        //    which rolls the debit back.
        let mut tx = self.pool.begin().await?;

        if re_offer.cost > 0 {
            let debited = sqlx::query(
                r#"
                UPDATE users
                SET points = points - ?
                WHERE user_id = ? AND points >= ?
                "#,
            )
            .bind(re_offer.cost)
            .bind(user_id)
            .bind(re_offer.cost)
            .execute(&mut *tx)
            .await?;

            if debited.rows_affected() == 0 {
                let available: i64 = sqlx::query("SELECT points FROM users WHERE user_id = ?")
                    .bind(user_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .map(|r| r.try_get::<i64, _>("points"))
                    .transpose()?
                    .unwrap_or(0);
                return Ok(ReOfferEntryOutcome::InsufficientBalance {
                    required: re_offer.cost,
                    available,
                });
            }
        }

        if !insert_claim_capped(&mut tx, user_id, item_id, RE_OFFER_WINNERS).await? {
            let count = count_claims(&mut tx, item_id).await?;
            return Ok(if count >= RE_OFFER_WINNERS {
                ReOfferEntryOutcome::CapReached
            } else {
                ReOfferEntryOutcome::AlreadyClaimed
            });
        }

        credit_points(&mut tx, user_id, reward).await?;
        tx.commit().await?;

        Ok(ReOfferEntryOutcome::Won { cost: re_offer.cost, reward })
    }
}
