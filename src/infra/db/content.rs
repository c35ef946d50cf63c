use async_trait::async_trait;

use crate::{
    application::repos::{ContentRepo, RepoError},
    domain::{entities::ContentEntry, keys::ContentUpsert},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ContentRow {
    key: String,
    section: String,
    value: String,
    kind: String,
}

impl From<ContentRow> for ContentEntry {
    fn from(row: ContentRow) -> Self {
        Self {
            key: row.key,
            section: row.section,
            value: row.value,
            kind: row.kind,
        }
    }
}

#[async_trait]
impl ContentRepo for PostgresRepositories {
    async fn list_content(&self) -> Result<Vec<ContentEntry>, RepoError> {
        let rows = sqlx::query_as::<_, ContentRow>(
            r#"
            SELECT key, section, value, type AS kind
            FROM site_content
            ORDER BY section, key
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ContentEntry::from).collect())
    }

    async fn upsert_content(&self, rows: &[ContentUpsert]) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        for row in rows {
            // `type` is left alone on conflict.
            sqlx::query(
                r#"
                INSERT INTO site_content (key, section, value)
                VALUES ($1, $2, $3)
                ON CONFLICT (key) DO UPDATE SET
                    section = EXCLUDED.section,
                    value = EXCLUDED.value,
                    updated_at = now()
                "#,
            )
            .bind(&row.key)
            .bind(&row.section)
            .bind(&row.value)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }
}
