//! Help-center administration: categories, articles and their images.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::repos::{
    HelpArticleParams, HelpCategoryParams, HelpImageParams, HelpRepo, HelpWriteRepo, RepoError,
    Visibility,
};
use crate::domain::entities::{
    HelpArticle, HelpArticleInput, HelpCategory, HelpCategoryInput, HelpCategoryRef,
    HelpCategorySummary, HelpImage, HelpImageInput,
};
use crate::domain::slug::{SlugAsyncError, SlugError, derive_slug, generate_unique_slug_async};
use vitrine_api_types::HelpArticleDetail;

use super::error::required;
use super::{AdminError, record_mutation};

const CATEGORY: &str = "help category";
const ARTICLE: &str = "help article";
const IMAGE: &str = "help image";

#[derive(Clone)]
pub struct AdminHelpService {
    reader: Arc<dyn HelpRepo>,
    writer: Arc<dyn HelpWriteRepo>,
}

impl AdminHelpService {
    pub fn new(reader: Arc<dyn HelpRepo>, writer: Arc<dyn HelpWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list_categories(&self) -> Result<Vec<HelpCategorySummary>, AdminError> {
        Ok(self.reader.list_categories(Visibility::All).await?)
    }

    pub async fn create_category(
        &self,
        actor: &str,
        input: HelpCategoryInput,
    ) -> Result<HelpCategory, AdminError> {
        let name = required(&input.name, "name")?;
        let slug = match explicit_slug(input.slug.as_deref())? {
            Some(slug) => slug,
            None => self.unique_category_slug(&name).await?,
        };

        let params = HelpCategoryParams {
            slug,
            name,
            description: input.description.trim().to_string(),
            icon: input.icon.trim().to_string(),
            order_num: input.order_num,
            status: input.status,
        };

        let category = self
            .writer
            .create_category(&params)
            .await
            .map_err(|err| AdminError::from_write(CATEGORY, &params.slug, err))?;
        record_mutation(actor, "help_categories", "create", &category.slug);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        actor: &str,
        id: i64,
        input: HelpCategoryInput,
    ) -> Result<HelpCategory, AdminError> {
        let existing = self
            .reader
            .find_category(id)
            .await?
            .ok_or_else(|| AdminError::not_found(CATEGORY, id))?;

        let params = HelpCategoryParams {
            slug: explicit_slug(input.slug.as_deref())?.unwrap_or(existing.slug),
            name: required(&input.name, "name")?,
            description: input.description.trim().to_string(),
            icon: input.icon.trim().to_string(),
            order_num: input.order_num,
            status: input.status,
        };

        let category = self
            .writer
            .update_category(id, &params)
            .await
            .map_err(|err| AdminError::from_write(CATEGORY, &params.slug, err))?
            .ok_or_else(|| AdminError::not_found(CATEGORY, id))?;
        record_mutation(actor, "help_categories", "update", &category.slug);
        Ok(category)
    }

    /// Delete the category with every article and image below it.
    pub async fn delete_category(&self, actor: &str, id: i64) -> Result<(), AdminError> {
        if !self.writer.delete_category_cascade(id).await? {
            return Err(AdminError::not_found(CATEGORY, id));
        }
        record_mutation(actor, "help_categories", "delete", &id.to_string());
        Ok(())
    }

    pub async fn list_articles(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<HelpArticle>, AdminError> {
        Ok(self
            .reader
            .list_articles(category_id, Visibility::All)
            .await?)
    }

    /// Article with its category and images, drafts included. Does not count a view.
    pub async fn article_detail(&self, id: i64) -> Result<HelpArticleDetail, AdminError> {
        let article = self
            .reader
            .find_article(id)
            .await?
            .ok_or_else(|| AdminError::not_found(ARTICLE, id))?;
        let category = self
            .reader
            .find_category(article.category_id)
            .await?
            .ok_or_else(|| AdminError::not_found(CATEGORY, article.category_id))?;
        let images = self.reader.list_images(article.id).await?;

        Ok(HelpArticleDetail {
            category: HelpCategoryRef {
                id: category.id,
                slug: category.slug,
                name: category.name,
            },
            article,
            images,
        })
    }

    pub async fn create_article(
        &self,
        actor: &str,
        input: HelpArticleInput,
    ) -> Result<HelpArticle, AdminError> {
        let title = required(&input.title, "title")?;
        self.ensure_category(input.category_id).await?;

        let slug = match explicit_slug(input.slug.as_deref())? {
            Some(slug) => slug,
            None => self.unique_article_slug(&title).await?,
        };
        let params = article_params(input, title, slug);

        let article = self
            .writer
            .create_article(&params)
            .await
            .map_err(|err| AdminError::from_write(ARTICLE, &params.slug, err))?;
        record_mutation(actor, "help_articles", "create", &article.slug);
        Ok(article)
    }

    pub async fn update_article(
        &self,
        actor: &str,
        id: i64,
        input: HelpArticleInput,
    ) -> Result<HelpArticle, AdminError> {
        let existing = self
            .reader
            .find_article(id)
            .await?
            .ok_or_else(|| AdminError::not_found(ARTICLE, id))?;
        let title = required(&input.title, "title")?;
        self.ensure_category(input.category_id).await?;

        let slug = explicit_slug(input.slug.as_deref())?.unwrap_or(existing.slug);
        let params = article_params(input, title, slug);

        let article = self
            .writer
            .update_article(id, &params)
            .await
            .map_err(|err| AdminError::from_write(ARTICLE, &params.slug, err))?
            .ok_or_else(|| AdminError::not_found(ARTICLE, id))?;
        record_mutation(actor, "help_articles", "update", &article.slug);
        Ok(article)
    }

    pub async fn delete_article(&self, actor: &str, id: i64) -> Result<(), AdminError> {
        if !self.writer.delete_article(id).await? {
            return Err(AdminError::not_found(ARTICLE, id));
        }
        record_mutation(actor, "help_articles", "delete", &id.to_string());
        Ok(())
    }

    pub async fn list_images(&self, article_id: i64) -> Result<Vec<HelpImage>, AdminError> {
        self.ensure_article(article_id).await?;
        Ok(self.reader.list_images(article_id).await?)
    }

    pub async fn add_image(
        &self,
        actor: &str,
        article_id: i64,
        input: HelpImageInput,
    ) -> Result<HelpImage, AdminError> {
        self.ensure_article(article_id).await?;
        let params = image_params(input)?;

        let image = self.writer.add_image(article_id, &params).await?;
        record_mutation(actor, "help_images", "create", &image.id.to_string());
        Ok(image)
    }

    pub async fn update_image(
        &self,
        actor: &str,
        id: i64,
        input: HelpImageInput,
    ) -> Result<HelpImage, AdminError> {
        let params = image_params(input)?;
        let image = self
            .writer
            .update_image(id, &params)
            .await?
            .ok_or_else(|| AdminError::not_found(IMAGE, id))?;
        record_mutation(actor, "help_images", "update", &id.to_string());
        Ok(image)
    }

    pub async fn delete_image(&self, actor: &str, id: i64) -> Result<(), AdminError> {
        if !self.writer.delete_image(id).await? {
            return Err(AdminError::not_found(IMAGE, id));
        }
        record_mutation(actor, "help_images", "delete", &id.to_string());
        Ok(())
    }

    /// Renumber the article's images in the given order. `image_ids` must name
    /// each of the article's images exactly once.
    pub async fn reorder_images(
        &self,
        actor: &str,
        article_id: i64,
        image_ids: Vec<i64>,
    ) -> Result<Vec<HelpImage>, AdminError> {
        let current = self.list_images(article_id).await?;
        let expected: BTreeSet<i64> = current.iter().map(|image| image.id).collect();
        let requested: BTreeSet<i64> = image_ids.iter().copied().collect();
        if requested.len() != image_ids.len() || requested != expected {
            return Err(AdminError::Invalid(
                "image_ids must list each image of the article exactly once".to_string(),
            ));
        }

        let images = self.writer.reorder_images(article_id, &image_ids).await?;
        record_mutation(actor, "help_images", "reorder", &article_id.to_string());
        Ok(images)
    }

    async fn ensure_category(&self, category_id: i64) -> Result<(), AdminError> {
        match self.reader.find_category(category_id).await? {
            Some(_) => Ok(()),
            None => Err(AdminError::Invalid(format!(
                "category_id {category_id} does not exist"
            ))),
        }
    }

    async fn ensure_article(&self, article_id: i64) -> Result<(), AdminError> {
        match self.reader.find_article(article_id).await? {
            Some(_) => Ok(()),
            None => Err(AdminError::not_found(ARTICLE, article_id)),
        }
    }

    async fn unique_category_slug(&self, name: &str) -> Result<String, AdminError> {
        let reader = self.reader.clone();
        let result = generate_unique_slug_async(name, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move {
                reader
                    .find_category_by_slug(&candidate)
                    .await
                    .map(|existing| existing.is_none())
            }
        })
        .await;
        slug_result(result)
    }

    async fn unique_article_slug(&self, title: &str) -> Result<String, AdminError> {
        let reader = self.reader.clone();
        let result = generate_unique_slug_async(title, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move {
                reader
                    .find_article_by_slug(&candidate)
                    .await
                    .map(|existing| existing.is_none())
            }
        })
        .await;
        slug_result(result)
    }
}

fn explicit_slug(slug: Option<&str>) -> Result<Option<String>, AdminError> {
    match slug.map(str::trim).filter(|slug| !slug.is_empty()) {
        Some(slug) => derive_slug(slug)
            .map(Some)
            .map_err(|err| AdminError::Invalid(err.to_string())),
        None => Ok(None),
    }
}

fn slug_result(result: Result<String, SlugAsyncError<RepoError>>) -> Result<String, AdminError> {
    match result {
        Ok(slug) => Ok(slug),
        Err(SlugAsyncError::Slug(SlugError::EmptyInput | SlugError::Unrepresentable { .. })) => {
            Err(AdminError::missing("slug"))
        }
        Err(SlugAsyncError::Slug(err @ SlugError::Exhausted { .. })) => {
            Err(AdminError::Invalid(err.to_string()))
        }
        Err(SlugAsyncError::Predicate(err)) => Err(AdminError::Repo(err)),
    }
}

fn article_params(input: HelpArticleInput, title: String, slug: String) -> HelpArticleParams {
    HelpArticleParams {
        category_id: input.category_id,
        slug,
        title,
        summary: input.summary.trim().to_string(),
        content: input.content,
        tags: input.tags,
        order_num: input.order_num,
        status: input.status,
    }
}

fn image_params(input: HelpImageInput) -> Result<HelpImageParams, AdminError> {
    Ok(HelpImageParams {
        url: required(&input.url, "url")?,
        caption: input.caption.trim().to_string(),
        order_num: input.order_num,
    })
}
