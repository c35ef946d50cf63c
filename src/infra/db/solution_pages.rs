use async_trait::async_trait;

use crate::{
    application::repos::{RepoError, SolutionPagesRepo, Visibility},
    domain::{
        entities::{NewSolutionPage, SolutionPage, SolutionPageFields},
        lists::{decode_list, encode_list},
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const PAGE_COLUMNS: &str = "id, slug, solution_id, title, subtitle, description, hero_image, \
     features, benefits, integrations, cta_text, cta_link, order_num, active";

#[derive(sqlx::FromRow)]
struct SolutionPageRow {
    id: i64,
    slug: String,
    solution_id: Option<String>,
    title: String,
    subtitle: String,
    description: String,
    hero_image: String,
    features: String,
    benefits: String,
    integrations: String,
    cta_text: String,
    cta_link: String,
    order_num: i32,
    active: bool,
}

impl From<SolutionPageRow> for SolutionPage {
    fn from(row: SolutionPageRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            fields: SolutionPageFields {
                solution_id: row.solution_id,
                title: row.title,
                subtitle: row.subtitle,
                description: row.description,
                hero_image: row.hero_image,
                features: decode_list("solution_pages.features", &row.features),
                benefits: decode_list("solution_pages.benefits", &row.benefits),
                integrations: decode_list("solution_pages.integrations", &row.integrations),
                cta_text: row.cta_text,
                cta_link: row.cta_link,
                order_num: row.order_num,
                active: row.active,
            },
        }
    }
}

#[async_trait]
impl SolutionPagesRepo for PostgresRepositories {
    async fn list_solution_pages(
        &self,
        visibility: Visibility,
    ) -> Result<Vec<SolutionPage>, RepoError> {
        let sql = format!(
            "SELECT {PAGE_COLUMNS} FROM solution_pages {} ORDER BY order_num, id",
            Self::active_filter(visibility)
        );
        let rows = sqlx::query_as::<_, SolutionPageRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SolutionPage::from).collect())
    }

    async fn find_solution_page(&self, slug: &str) -> Result<Option<SolutionPage>, RepoError> {
        let sql = format!("SELECT {PAGE_COLUMNS} FROM solution_pages WHERE slug = $1");
        let row = sqlx::query_as::<_, SolutionPageRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(SolutionPage::from))
    }

    async fn create_solution_page(
        &self,
        page: &NewSolutionPage,
    ) -> Result<SolutionPage, RepoError> {
        let fields = &page.fields;
        let sql = format!(
            r#"
            INSERT INTO solution_pages
                (slug, solution_id, title, subtitle, description, hero_image,
                 features, benefits, integrations, cta_text, cta_link, order_num, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {PAGE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SolutionPageRow>(&sql)
            .bind(&page.slug)
            .bind(fields.solution_id.as_deref())
            .bind(&fields.title)
            .bind(&fields.subtitle)
            .bind(&fields.description)
            .bind(&fields.hero_image)
            .bind(encode_list(&fields.features))
            .bind(encode_list(&fields.benefits))
            .bind(encode_list(&fields.integrations))
            .bind(&fields.cta_text)
            .bind(&fields.cta_link)
            .bind(fields.order_num)
            .bind(fields.active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(SolutionPage::from(row))
    }

    async fn update_solution_page(
        &self,
        slug: &str,
        fields: &SolutionPageFields,
    ) -> Result<Option<SolutionPage>, RepoError> {
        let sql = format!(
            r#"
            UPDATE solution_pages SET
                solution_id = $2,
                title = $3,
                subtitle = $4,
                description = $5,
                hero_image = $6,
                features = $7,
                benefits = $8,
                integrations = $9,
                cta_text = $10,
                cta_link = $11,
                order_num = $12,
                active = $13,
                updated_at = now()
            WHERE slug = $1
            RETURNING {PAGE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SolutionPageRow>(&sql)
            .bind(slug)
            .bind(fields.solution_id.as_deref())
            .bind(&fields.title)
            .bind(&fields.subtitle)
            .bind(&fields.description)
            .bind(&fields.hero_image)
            .bind(encode_list(&fields.features))
            .bind(encode_list(&fields.benefits))
            .bind(encode_list(&fields.integrations))
            .bind(&fields.cta_text)
            .bind(&fields.cta_link)
            .bind(fields.order_num)
            .bind(fields.active)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(SolutionPage::from))
    }

    async fn delete_solution_page(&self, slug: &str) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM solution_pages WHERE slug = $1")
            .bind(slug)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
