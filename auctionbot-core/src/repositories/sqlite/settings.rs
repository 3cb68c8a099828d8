// File: auctionbot-core/src/repositories/sqlite/settings.rs

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use auctionbot_common::models::{AuctionSettings, SettingKey};
use auctionbot_common::traits::repository_traits::SettingsRepository;
use crate::Error;

#[derive(Clone)]
pub struct SqliteSettingsRepository {
    pool: Pool<Sqlite>,
}

impl SqliteSettingsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, Error> {
        let row = sqlx::query("SELECT value FROM settings WHERE name = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(r.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: SettingKey, value: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO settings (name, value)
            VALUES (?, ?)
            ON CONFLICT (name) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn seed_defaults(&self) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;
        for key in SettingKey::ALL {
            sqlx::query("INSERT OR IGNORE INTO settings (name, value) VALUES (?, ?)")
                .bind(key.as_str())
                .bind(key.default_value())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>, Error> {
        let rows = sqlx::query("SELECT name, value FROM settings ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push((r.try_get("name")?, r.try_get("value")?));
        }
        Ok(out)
    }

    async fn snapshot(&self) -> Result<AuctionSettings, Error> {
        let pairs = self.list_all().await?;
        AuctionSettings::from_pairs(pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())))
    }
}
