use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{
        HelpArticleParams, HelpCategoryParams, HelpImageParams, HelpRepo, HelpWriteRepo,
        RepoError, Visibility,
    },
    domain::{
        entities::{HelpArticle, HelpCategory, HelpCategorySummary, HelpImage, HelpStatus},
        lists::{decode_list, encode_list},
    },
};

use super::{PostgresRepositories, map_sqlx_error, util::like_pattern};

const CATEGORY_COLUMNS: &str = "c.id, c.slug, c.name, c.description, c.icon, c.order_num, c.status";

const ARTICLE_COLUMNS: &str = "a.id, a.category_id, a.slug, a.title, a.summary, a.content, a.tags, \
     a.order_num, a.status, a.views, a.created_at, a.updated_at";

const IMAGE_COLUMNS: &str = "id, article_id, url, caption, order_num";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    slug: String,
    name: String,
    description: String,
    icon: String,
    order_num: i32,
    status: HelpStatus,
}

impl From<CategoryRow> for HelpCategory {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            icon: row.icon,
            order_num: row.order_num,
            status: row.status,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategorySummaryRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    article_count: i64,
}

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    category_id: i64,
    slug: String,
    title: String,
    summary: String,
    content: String,
    tags: String,
    order_num: i32,
    status: HelpStatus,
    views: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ArticleRow> for HelpArticle {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            slug: row.slug,
            title: row.title,
            summary: row.summary,
            content: row.content,
            tags: decode_list("help_articles.tags", &row.tags),
            order_num: row.order_num,
            status: row.status,
            views: row.views,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: i64,
    article_id: i64,
    url: String,
    caption: String,
    order_num: i32,
}

impl From<ImageRow> for HelpImage {
    fn from(row: ImageRow) -> Self {
        Self {
            id: row.id,
            article_id: row.article_id,
            url: row.url,
            caption: row.caption,
            order_num: row.order_num,
        }
    }
}

#[async_trait]
impl HelpRepo for PostgresRepositories {
    async fn list_categories(
        &self,
        visibility: Visibility,
    ) -> Result<Vec<HelpCategorySummary>, RepoError> {
        let filter = match visibility {
            Visibility::Public => "WHERE c.status = 'published'",
            Visibility::All => "",
        };
        let sql = format!(
            r#"
            SELECT {CATEGORY_COLUMNS},
                   (SELECT COUNT(*)
                    FROM help_articles a
                    WHERE a.category_id = c.id AND a.status = 'published') AS article_count
            FROM help_categories c
            {filter}
            ORDER BY c.order_num, c.id
            "#
        );
        let rows = sqlx::query_as::<_, CategorySummaryRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| HelpCategorySummary {
                category: HelpCategory::from(row.category),
                article_count: row.article_count,
            })
            .collect())
    }

    async fn find_category(&self, id: i64) -> Result<Option<HelpCategory>, RepoError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM help_categories c WHERE c.id = $1");
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(HelpCategory::from))
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<HelpCategory>, RepoError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM help_categories c WHERE c.slug = $1");
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(HelpCategory::from))
    }

    async fn list_articles(
        &self,
        category_id: Option<i64>,
        visibility: Visibility,
    ) -> Result<Vec<HelpArticle>, RepoError> {
        let status_filter = match visibility {
            Visibility::Public => "AND a.status = 'published'",
            Visibility::All => "",
        };
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM help_articles a
            WHERE ($1::BIGINT IS NULL OR a.category_id = $1)
            {status_filter}
            ORDER BY a.order_num, a.id
            "#
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(category_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(HelpArticle::from).collect())
    }

    async fn find_article(&self, id: i64) -> Result<Option<HelpArticle>, RepoError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM help_articles a WHERE a.id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(HelpArticle::from))
    }

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<HelpArticle>, RepoError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM help_articles a WHERE a.slug = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(HelpArticle::from))
    }

    async fn search_articles(&self, needle: &str) -> Result<Vec<HelpArticle>, RepoError> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM help_articles a
            INNER JOIN help_categories c ON c.id = a.category_id
            WHERE a.status = 'published'
              AND c.status = 'published'
              AND (a.title ILIKE $1 ESCAPE '\'
                   OR a.summary ILIKE $1 ESCAPE '\'
                   OR a.content ILIKE $1 ESCAPE '\')
            ORDER BY a.views DESC, a.order_num, a.id
            "#
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(like_pattern(needle))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(HelpArticle::from).collect())
    }

    async fn list_images(&self, article_id: i64) -> Result<Vec<HelpImage>, RepoError> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM help_images WHERE article_id = $1 ORDER BY order_num, id"
        );
        let rows = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(article_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(HelpImage::from).collect())
    }
}

#[async_trait]
impl HelpWriteRepo for PostgresRepositories {
    async fn create_category(
        &self,
        params: &HelpCategoryParams,
    ) -> Result<HelpCategory, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO help_categories AS c (slug, name, description, icon, order_num, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CATEGORY_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(&params.slug)
            .bind(&params.name)
            .bind(&params.description)
            .bind(&params.icon)
            .bind(params.order_num)
            .bind(params.status)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(HelpCategory::from(row))
    }

    async fn update_category(
        &self,
        id: i64,
        params: &HelpCategoryParams,
    ) -> Result<Option<HelpCategory>, RepoError> {
        let sql = format!(
            r#"
            UPDATE help_categories AS c SET
                slug = $2,
                name = $3,
                description = $4,
                icon = $5,
                order_num = $6,
                status = $7,
                updated_at = now()
            WHERE c.id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .bind(&params.slug)
            .bind(&params.name)
            .bind(&params.description)
            .bind(&params.icon)
            .bind(params.order_num)
            .bind(params.status)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(HelpCategory::from))
    }

    async fn delete_category_cascade(&self, id: i64) -> Result<bool, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            DELETE FROM help_images
            WHERE article_id IN (SELECT id FROM help_articles WHERE category_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM help_articles WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM help_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_article(&self, params: &HelpArticleParams) -> Result<HelpArticle, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO help_articles AS a
                (category_id, slug, title, summary, content, tags, order_num, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ARTICLE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(params.category_id)
            .bind(&params.slug)
            .bind(&params.title)
            .bind(&params.summary)
            .bind(&params.content)
            .bind(encode_list(&params.tags))
            .bind(params.order_num)
            .bind(params.status)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(HelpArticle::from(row))
    }

    async fn update_article(
        &self,
        id: i64,
        params: &HelpArticleParams,
    ) -> Result<Option<HelpArticle>, RepoError> {
        let sql = format!(
            r#"
            UPDATE help_articles AS a SET
                category_id = $2,
                slug = $3,
                title = $4,
                summary = $5,
                content = $6,
                tags = $7,
                order_num = $8,
                status = $9,
                updated_at = now()
            WHERE a.id = $1
            RETURNING {ARTICLE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(id)
            .bind(params.category_id)
            .bind(&params.slug)
            .bind(&params.title)
            .bind(&params.summary)
            .bind(&params.content)
            .bind(encode_list(&params.tags))
            .bind(params.order_num)
            .bind(params.status)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(HelpArticle::from))
    }

    async fn delete_article(&self, id: i64) -> Result<bool, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM help_images WHERE article_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM help_articles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_article_views(&self, id: i64) -> Result<(), RepoError> {
        sqlx::query("UPDATE help_articles SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn add_image(
        &self,
        article_id: i64,
        params: &HelpImageParams,
    ) -> Result<HelpImage, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO help_images (article_id, url, caption, order_num)
            VALUES (
                $1, $2, $3,
                COALESCE($4, (SELECT COALESCE(MAX(order_num) + 1, 0)
                              FROM help_images
                              WHERE article_id = $1))
            )
            RETURNING {IMAGE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(article_id)
            .bind(&params.url)
            .bind(&params.caption)
            .bind(params.order_num)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(HelpImage::from(row))
    }

    async fn update_image(
        &self,
        id: i64,
        params: &HelpImageParams,
    ) -> Result<Option<HelpImage>, RepoError> {
        let sql = format!(
            r#"
            UPDATE help_images SET
                url = $2,
                caption = $3,
                order_num = COALESCE($4, order_num)
            WHERE id = $1
            RETURNING {IMAGE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(id)
            .bind(&params.url)
            .bind(&params.caption)
            .bind(params.order_num)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(HelpImage::from))
    }

    async fn delete_image(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM help_images WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn reorder_images(
        &self,
        article_id: i64,
        image_ids: &[i64],
    ) -> Result<Vec<HelpImage>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        for (position, image_id) in image_ids.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| RepoError::from_persistence("too many images to reorder"))?;
            let result =
                sqlx::query("UPDATE help_images SET order_num = $3 WHERE id = $1 AND article_id = $2")
                    .bind(image_id)
                    .bind(article_id)
                    .bind(position)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;
            if result.rows_affected() == 0 {
                return Err(RepoError::InvalidInput {
                    message: format!("image {image_id} does not belong to article {article_id}"),
                });
            }
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        self.list_images(article_id).await
    }
}
