use async_trait::async_trait;

use crate::{
    application::repos::{BannersRepo, RepoError},
    domain::entities::{Banner, BannerFields, BannerPageCount},
};
use vitrine_api_types::DEFAULT_BANNER_PAGE;

use super::{PostgresRepositories, map_sqlx_error};

const BANNER_COLUMNS: &str = "id, title, subtitle, description, image, cta_text, cta_link, \
     order_num, active, use_default_bg, bg_color, page";

#[derive(sqlx::FromRow)]
struct BannerRow {
    id: i64,
    title: String,
    subtitle: String,
    description: String,
    image: String,
    cta_text: String,
    cta_link: String,
    order_num: i32,
    active: bool,
    use_default_bg: bool,
    bg_color: String,
    page: Option<String>,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Self {
            id: row.id,
            fields: BannerFields {
                title: row.title,
                subtitle: row.subtitle,
                description: row.description,
                image: row.image,
                cta_text: row.cta_text,
                cta_link: row.cta_link,
                order_num: row.order_num,
                active: row.active,
                use_default_bg: row.use_default_bg,
                bg_color: row.bg_color,
                page: Some(row.page.unwrap_or_else(|| DEFAULT_BANNER_PAGE.to_string())),
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct BannerPageCountRow {
    page: String,
    total: i64,
    active: i64,
}

impl PostgresRepositories {
    async fn fetch_banners(
        &self,
        sql: &str,
        page: Option<&str>,
    ) -> Result<Vec<Banner>, RepoError> {
        let mut query = sqlx::query_as::<_, BannerRow>(sql);
        if let Some(page) = page {
            query = query.bind(page.to_string());
        }
        let rows = query
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Banner::from).collect())
    }
}

#[async_trait]
impl BannersRepo for PostgresRepositories {
    async fn list_banners_for_page(&self, page: &str) -> Result<Vec<Banner>, RepoError> {
        let sql = format!(
            r#"
            SELECT {BANNER_COLUMNS}
            FROM banners
            WHERE active
              AND (page = $1 OR ($1 = '{DEFAULT_BANNER_PAGE}' AND page IS NULL))
            ORDER BY order_num, id
            "#
        );
        self.fetch_banners(&sql, Some(page)).await
    }

    async fn list_active_banners(&self) -> Result<Vec<Banner>, RepoError> {
        let sql = format!(
            r#"
            SELECT {BANNER_COLUMNS}
            FROM banners
            WHERE active
            ORDER BY COALESCE(page, '{DEFAULT_BANNER_PAGE}'), order_num, id
            "#
        );
        self.fetch_banners(&sql, None).await
    }

    async fn list_all_banners(&self, page: Option<&str>) -> Result<Vec<Banner>, RepoError> {
        let sql = match page {
            Some(_) => format!(
                r#"
                SELECT {BANNER_COLUMNS}
                FROM banners
                WHERE COALESCE(page, '{DEFAULT_BANNER_PAGE}') = $1
                ORDER BY order_num, id
                "#
            ),
            None => format!(
                r#"
                SELECT {BANNER_COLUMNS}
                FROM banners
                ORDER BY COALESCE(page, '{DEFAULT_BANNER_PAGE}'), order_num, id
                "#
            ),
        };
        self.fetch_banners(&sql, page).await
    }

    async fn banner_page_counts(&self) -> Result<Vec<BannerPageCount>, RepoError> {
        let sql = format!(
            r#"
            SELECT COALESCE(page, '{DEFAULT_BANNER_PAGE}') AS page,
                   COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE active) AS active
            FROM banners
            GROUP BY 1
            ORDER BY 1
            "#
        );
        let rows = sqlx::query_as::<_, BannerPageCountRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| BannerPageCount {
                page: row.page,
                total: row.total,
                active: row.active,
            })
            .collect())
    }

    async fn find_banner(&self, id: i64) -> Result<Option<Banner>, RepoError> {
        let sql = format!("SELECT {BANNER_COLUMNS} FROM banners WHERE id = $1");
        let row = sqlx::query_as::<_, BannerRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Banner::from))
    }

    async fn create_banner(&self, fields: &BannerFields) -> Result<Banner, RepoError> {
        let page = fields.page.as_deref().unwrap_or(DEFAULT_BANNER_PAGE);
        let sql = format!(
            r#"
            INSERT INTO banners
                (title, subtitle, description, image, cta_text, cta_link,
                 order_num, active, use_default_bg, bg_color, page)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {BANNER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, BannerRow>(&sql)
            .bind(&fields.title)
            .bind(&fields.subtitle)
            .bind(&fields.description)
            .bind(&fields.image)
            .bind(&fields.cta_text)
            .bind(&fields.cta_link)
            .bind(fields.order_num)
            .bind(fields.active)
            .bind(fields.use_default_bg)
            .bind(&fields.bg_color)
            .bind(page)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(Banner::from(row))
    }

    async fn update_banner(
        &self,
        id: i64,
        fields: &BannerFields,
    ) -> Result<Option<Banner>, RepoError> {
        let page = fields.page.as_deref().unwrap_or(DEFAULT_BANNER_PAGE);
        let sql = format!(
            r#"
            UPDATE banners SET
                title = $2,
                subtitle = $3,
                description = $4,
                image = $5,
                cta_text = $6,
                cta_link = $7,
                order_num = $8,
                active = $9,
                use_default_bg = $10,
                bg_color = $11,
                page = $12,
                updated_at = now()
            WHERE id = $1
            RETURNING {BANNER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, BannerRow>(&sql)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.subtitle)
            .bind(&fields.description)
            .bind(&fields.image)
            .bind(&fields.cta_text)
            .bind(&fields.cta_link)
            .bind(fields.order_num)
            .bind(fields.active)
            .bind(fields.use_default_bg)
            .bind(&fields.bg_color)
            .bind(page)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Banner::from))
    }

    async fn deactivate_banner(&self, id: i64) -> Result<bool, RepoError> {
        let result =
            sqlx::query("UPDATE banners SET active = FALSE, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
