use async_trait::async_trait;

use crate::{
    application::repos::{RepoError, StatsRepo},
    domain::entities::{NewStat, Stat, StatFields},
};

use super::{PostgresRepositories, map_sqlx_error};

const STAT_COLUMNS: &str = "id, stat_id, value, label, section, order_num";

#[derive(sqlx::FromRow)]
struct StatRow {
    id: i64,
    stat_id: String,
    value: String,
    label: String,
    section: String,
    order_num: i32,
}

impl From<StatRow> for Stat {
    fn from(row: StatRow) -> Self {
        Self {
            id: row.id,
            stat_id: row.stat_id,
            fields: StatFields {
                value: row.value,
                label: row.label,
                section: row.section,
                order_num: row.order_num,
            },
        }
    }
}

#[async_trait]
impl StatsRepo for PostgresRepositories {
    async fn list_stats(&self) -> Result<Vec<Stat>, RepoError> {
        let sql = format!("SELECT {STAT_COLUMNS} FROM stats ORDER BY order_num, id");
        let rows = sqlx::query_as::<_, StatRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Stat::from).collect())
    }

    async fn create_stat(&self, stat: &NewStat) -> Result<Stat, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO stats (stat_id, value, label, section, order_num)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {STAT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, StatRow>(&sql)
            .bind(&stat.stat_id)
            .bind(&stat.fields.value)
            .bind(&stat.fields.label)
            .bind(&stat.fields.section)
            .bind(stat.fields.order_num)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(Stat::from(row))
    }

    async fn update_stat(
        &self,
        stat_id: &str,
        fields: &StatFields,
    ) -> Result<Option<Stat>, RepoError> {
        let sql = format!(
            r#"
            UPDATE stats SET
                value = $2,
                label = $3,
                section = $4,
                order_num = $5,
                updated_at = now()
            WHERE stat_id = $1
            RETURNING {STAT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, StatRow>(&sql)
            .bind(stat_id)
            .bind(&fields.value)
            .bind(&fields.label)
            .bind(&fields.section)
            .bind(fields.order_num)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Stat::from))
    }

    async fn delete_stat(&self, stat_id: &str) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM stats WHERE stat_id = $1")
            .bind(stat_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
