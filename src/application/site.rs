//! Read-only façade consumed by the public website.
//!
//! Only active catalog rows and published help content are visible here.
//! The help article detail is the single read with a side effect: it counts
//! a view.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::debug;

use crate::application::repos::{
    BannersRepo, ContentRepo, HelpRepo, HelpWriteRepo, RepoError, SegmentsRepo, SettingsRepo,
    SolutionPagesRepo, SolutionsRepo, StatsRepo, Visibility,
};
use crate::domain::entities::{
    Banner, HelpArticle, HelpCategoryRef, HelpCategorySummary, HelpStatus, Segment, Solution,
    SolutionPage, Stat,
};
use vitrine_api_types::content::{ContentMap, SettingsMap, decode_quick_links, fold_entries};
use vitrine_api_types::{CategoryArticles, DEFAULT_BANNER_PAGE, HelpArticleDetail, QuickLink};

pub const METRIC_HELP_VIEWS: &str = "vitrine_help_article_views_total";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{entity} `{key}` not found")]
    NotFound { entity: &'static str, key: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl SiteError {
    fn not_found(entity: &'static str, key: &str) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Repositories backing the façade.
#[derive(Clone)]
pub struct SiteRepos {
    pub content: Arc<dyn ContentRepo>,
    pub settings: Arc<dyn SettingsRepo>,
    pub solutions: Arc<dyn SolutionsRepo>,
    pub segments: Arc<dyn SegmentsRepo>,
    pub stats: Arc<dyn StatsRepo>,
    pub banners: Arc<dyn BannersRepo>,
    pub solution_pages: Arc<dyn SolutionPagesRepo>,
    pub help: Arc<dyn HelpRepo>,
    pub help_writer: Arc<dyn HelpWriteRepo>,
}

#[derive(Clone)]
pub struct SiteService {
    repos: SiteRepos,
}

impl SiteService {
    pub fn new(repos: SiteRepos) -> Self {
        Self { repos }
    }

    pub async fn content(&self) -> Result<ContentMap, SiteError> {
        let rows = self.repos.content.list_content().await?;
        Ok(fold_entries(rows.into_iter().map(|row| (row.key, row.value))))
    }

    pub async fn quick_links(&self) -> Result<Vec<QuickLink>, SiteError> {
        Ok(decode_quick_links(&self.content().await?))
    }

    pub async fn settings(&self) -> Result<SettingsMap, SiteError> {
        let rows = self.repos.settings.list_settings().await?;
        Ok(fold_entries(rows.into_iter().map(|row| (row.key, row.value))))
    }

    pub async fn solutions(&self) -> Result<Vec<Solution>, SiteError> {
        Ok(self.repos.solutions.list_solutions(Visibility::Public).await?)
    }

    pub async fn segments(&self) -> Result<Vec<Segment>, SiteError> {
        Ok(self.repos.segments.list_segments(Visibility::Public).await?)
    }

    pub async fn stats(&self) -> Result<Vec<Stat>, SiteError> {
        Ok(self.repos.stats.list_stats().await?)
    }

    /// Active banners of `page`; a blank page means the home page.
    pub async fn banners(&self, page: &str) -> Result<Vec<Banner>, SiteError> {
        let page = match page.trim() {
            "" => DEFAULT_BANNER_PAGE,
            page => page,
        };
        Ok(self.repos.banners.list_banners_for_page(page).await?)
    }

    pub async fn all_banners(&self) -> Result<Vec<Banner>, SiteError> {
        Ok(self.repos.banners.list_active_banners().await?)
    }

    pub async fn solution_pages(&self) -> Result<Vec<SolutionPage>, SiteError> {
        Ok(self
            .repos
            .solution_pages
            .list_solution_pages(Visibility::Public)
            .await?)
    }

    pub async fn solution_page(&self, slug: &str) -> Result<SolutionPage, SiteError> {
        self.repos
            .solution_pages
            .find_solution_page(slug)
            .await?
            .filter(|page| page.fields.active)
            .ok_or_else(|| SiteError::not_found("solution page", slug))
    }

    pub async fn help_categories(&self) -> Result<Vec<HelpCategorySummary>, SiteError> {
        Ok(self.repos.help.list_categories(Visibility::Public).await?)
    }

    pub async fn category_articles(&self, slug: &str) -> Result<CategoryArticles, SiteError> {
        let category = self
            .repos
            .help
            .find_category_by_slug(slug)
            .await?
            .filter(|category| category.status == HelpStatus::Published)
            .ok_or_else(|| SiteError::not_found("help category", slug))?;
        let articles = self
            .repos
            .help
            .list_articles(Some(category.id), Visibility::Public)
            .await?;

        Ok(CategoryArticles { category, articles })
    }

    /// Published article with its category and images, then count the view.
    ///
    /// The returned `views` is the count before this read.
    pub async fn help_article(&self, slug: &str) -> Result<HelpArticleDetail, SiteError> {
        let article = self
            .repos
            .help
            .find_article_by_slug(slug)
            .await?
            .filter(|article| article.status == HelpStatus::Published)
            .ok_or_else(|| SiteError::not_found("help article", slug))?;
        let category = self
            .repos
            .help
            .find_category(article.category_id)
            .await?
            .filter(|category| category.status == HelpStatus::Published)
            .ok_or_else(|| SiteError::not_found("help article", slug))?;
        let images = self.repos.help.list_images(article.id).await?;

        self.repos
            .help_writer
            .increment_article_views(article.id)
            .await?;
        counter!(METRIC_HELP_VIEWS).increment(1);
        debug!(
            target = "vitrine::site::help",
            article_id = article.id,
            "help article view counted"
        );

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

    pub async fn search_help(&self, query: &str) -> Result<Vec<HelpArticle>, SiteError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.repos.help.search_articles(query).await?)
    }
}
