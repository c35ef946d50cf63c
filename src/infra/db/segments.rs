use async_trait::async_trait;

use crate::{
    application::repos::{RepoError, SegmentsRepo, Visibility},
    domain::entities::{NewSegment, Segment, SegmentFields},
};

use super::{PostgresRepositories, map_sqlx_error};

const SEGMENT_COLUMNS: &str = "id, segment_id, name, icon, order_num, active";

#[derive(sqlx::FromRow)]
struct SegmentRow {
    id: i64,
    segment_id: String,
    name: String,
    icon: String,
    order_num: i32,
    active: bool,
}

impl From<SegmentRow> for Segment {
    fn from(row: SegmentRow) -> Self {
        Self {
            id: row.id,
            segment_id: row.segment_id,
            fields: SegmentFields {
                name: row.name,
                icon: row.icon,
                order_num: row.order_num,
                active: row.active,
            },
        }
    }
}

#[async_trait]
impl SegmentsRepo for PostgresRepositories {
    async fn list_segments(&self, visibility: Visibility) -> Result<Vec<Segment>, RepoError> {
        let sql = format!(
            "SELECT {SEGMENT_COLUMNS} FROM segments {} ORDER BY order_num, id",
            Self::active_filter(visibility)
        );
        let rows = sqlx::query_as::<_, SegmentRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Segment::from).collect())
    }

    async fn create_segment(&self, segment: &NewSegment) -> Result<Segment, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO segments (segment_id, name, icon, order_num, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SEGMENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SegmentRow>(&sql)
            .bind(&segment.segment_id)
            .bind(&segment.fields.name)
            .bind(&segment.fields.icon)
            .bind(segment.fields.order_num)
            .bind(segment.fields.active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(Segment::from(row))
    }

    async fn update_segment(
        &self,
        segment_id: &str,
        fields: &SegmentFields,
    ) -> Result<Option<Segment>, RepoError> {
        let sql = format!(
            r#"
            UPDATE segments SET
                name = $2,
                icon = $3,
                order_num = $4,
                active = $5,
                updated_at = now()
            WHERE segment_id = $1
            RETURNING {SEGMENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SegmentRow>(&sql)
            .bind(segment_id)
            .bind(&fields.name)
            .bind(&fields.icon)
            .bind(fields.order_num)
            .bind(fields.active)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Segment::from))
    }

    async fn delete_segment(&self, segment_id: &str) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM segments WHERE segment_id = $1")
            .bind(segment_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
