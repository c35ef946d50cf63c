use async_trait::async_trait;

use crate::{
    application::repos::{RepoError, SettingsRepo},
    domain::entities::SettingEntry,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SettingRow {
    key: String,
    value: String,
}

#[async_trait]
impl SettingsRepo for PostgresRepositories {
    async fn list_settings(&self) -> Result<Vec<SettingEntry>, RepoError> {
        let rows = sqlx::query_as::<_, SettingRow>(
            r#"
            SELECT key, value
            FROM site_settings
            ORDER BY key
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| SettingEntry {
                key: row.key,
                value: row.value,
            })
            .collect())
    }

    async fn upsert_settings(&self, pairs: &[(String, String)]) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        for (key, value) in pairs {
            sqlx::query(
                r#"
                INSERT INTO site_settings (key, value)
                VALUES ($1, $2)
                ON CONFLICT (key) DO UPDATE SET
                    value = EXCLUDED.value,
                    updated_at = now()
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }
}
