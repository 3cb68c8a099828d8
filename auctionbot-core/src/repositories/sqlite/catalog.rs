// src/repositories/sqlite/catalog.rs

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use auctionbot_common::models::Item;
use auctionbot_common::traits::repository_traits::CatalogRepository;
use crate::utils::time::{current_epoch, from_epoch};
use crate::Error;

#[derive(Clone)]
pub struct SqliteCatalogRepository {
    pool: Pool<Sqlite>,
}

impl SqliteCatalogRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn row_to_item(r: &SqliteRow) -> Result<Item, Error> {
        Ok(Item {
            item_id: r.try_get("item_id")?,
            image: r.try_get("image")?,
            consumed: r.try_get("consumed")?,
            added_by: r.try_get("added_by")?,
            added_at: from_epoch(r.try_get::<i64, _>("added_at")?),
        })
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn add_item(&self, image: &str, added_by: Option<i64>) -> Result<Item, Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO items (image, consumed, added_by, added_at)
            VALUES (?, 0, ?, ?)
            RETURNING item_id, image, consumed, added_by, added_at
            "#,
        )
        .bind(image)
        .bind(added_by)
        .bind(current_epoch())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_item(&row)
    }

    async fn get_item(&self, item_id: i64) -> Result<Option<Item>, Error> {
        let row = sqlx::query(
            r#"
            SELECT item_id, image, consumed, added_by, added_at
            FROM items
            WHERE item_id = ?
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn random_unconsumed(&self) -> Result<Option<Item>, Error> {
        let row = sqlx::query(
            r#"
            SELECT item_id, image, consumed, added_by, added_at
            FROM items
            WHERE consumed = 0
              AND item_id NOT IN (SELECT item_id FROM re_offers)
            ORDER BY RANDOM()
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn mark_consumed(&self, item_id: i64) -> Result<(), Error> {
        sqlx::query("UPDATE items SET consumed = 1 WHERE item_id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn reset_all_consumed(&self) -> Result<u64, Error> {
        let result = sqlx::query("UPDATE items SET consumed = 0 WHERE consumed = 1")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> Result<Vec<Item>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, image, consumed, added_by, added_at
            FROM items
            ORDER BY added_at DESC, item_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM items WHERE item_id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn image_for(&self, item_id: i64) -> Result<Option<String>, Error> {
        let row = sqlx::query("SELECT image FROM items WHERE item_id = ?")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(r.try_get("image")?)),
            None => Ok(None),
        }
    }

    async fn has_image(&self, image: &str) -> Result<bool, Error> {
        let row = sqlx::query("SELECT 1 AS present FROM items WHERE image = ? LIMIT 1")
            .bind(image)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}
