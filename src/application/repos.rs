//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    AdminUserRecord, Banner, BannerFields, BannerPageCount, ContentEntry, HelpArticle,
    HelpCategory, HelpCategorySummary, HelpImage, HelpStatus, NewSegment, NewSolution,
    NewSolutionPage, NewStat, Segment, SegmentFields, SettingEntry, Solution, SolutionFields,
    SolutionPage, SolutionPageFields, Stat, StatFields,
};
use crate::domain::keys::ContentUpsert;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Visibility filter applied to listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only rows the public site may show.
    Public,
    /// Every row, for the admin dashboard.
    All,
}

#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn list_content(&self) -> Result<Vec<ContentEntry>, RepoError>;

    /// Upsert every row or none of them.
    async fn upsert_content(&self, rows: &[ContentUpsert]) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn list_settings(&self) -> Result<Vec<SettingEntry>, RepoError>;

    /// Upsert every pair or none of them.
    async fn upsert_settings(&self, pairs: &[(String, String)]) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SolutionsRepo: Send + Sync {
    async fn list_solutions(&self, visibility: Visibility) -> Result<Vec<Solution>, RepoError>;

    async fn create_solution(&self, solution: &NewSolution) -> Result<Solution, RepoError>;

    async fn update_solution(
        &self,
        solution_id: &str,
        fields: &SolutionFields,
    ) -> Result<Option<Solution>, RepoError>;

    async fn delete_solution(&self, solution_id: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait SegmentsRepo: Send + Sync {
    async fn list_segments(&self, visibility: Visibility) -> Result<Vec<Segment>, RepoError>;

    async fn create_segment(&self, segment: &NewSegment) -> Result<Segment, RepoError>;

    async fn update_segment(
        &self,
        segment_id: &str,
        fields: &SegmentFields,
    ) -> Result<Option<Segment>, RepoError>;

    async fn delete_segment(&self, segment_id: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait StatsRepo: Send + Sync {
    async fn list_stats(&self) -> Result<Vec<Stat>, RepoError>;

    async fn create_stat(&self, stat: &NewStat) -> Result<Stat, RepoError>;

    async fn update_stat(
        &self,
        stat_id: &str,
        fields: &StatFields,
    ) -> Result<Option<Stat>, RepoError>;

    async fn delete_stat(&self, stat_id: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait BannersRepo: Send + Sync {
    /// Active banners of one page. The home page also matches legacy rows
    /// without a page.
    async fn list_banners_for_page(&self, page: &str) -> Result<Vec<Banner>, RepoError>;

    /// Active banners of every page.
    async fn list_active_banners(&self) -> Result<Vec<Banner>, RepoError>;

    /// Every banner, soft-deleted ones included, optionally scoped to a page.
    async fn list_all_banners(&self, page: Option<&str>) -> Result<Vec<Banner>, RepoError>;

    async fn banner_page_counts(&self) -> Result<Vec<BannerPageCount>, RepoError>;

    async fn find_banner(&self, id: i64) -> Result<Option<Banner>, RepoError>;

    async fn create_banner(&self, fields: &BannerFields) -> Result<Banner, RepoError>;

    async fn update_banner(
        &self,
        id: i64,
        fields: &BannerFields,
    ) -> Result<Option<Banner>, RepoError>;

    /// Soft delete: the row stays, flagged inactive.
    async fn deactivate_banner(&self, id: i64) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait SolutionPagesRepo: Send + Sync {
    async fn list_solution_pages(
        &self,
        visibility: Visibility,
    ) -> Result<Vec<SolutionPage>, RepoError>;

    async fn find_solution_page(&self, slug: &str) -> Result<Option<SolutionPage>, RepoError>;

    async fn create_solution_page(&self, page: &NewSolutionPage)
    -> Result<SolutionPage, RepoError>;

    async fn update_solution_page(
        &self,
        slug: &str,
        fields: &SolutionPageFields,
    ) -> Result<Option<SolutionPage>, RepoError>;

    async fn delete_solution_page(&self, slug: &str) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpCategoryParams {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub order_num: i32,
    pub status: HelpStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpArticleParams {
    pub category_id: i64,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub tags: Vec<String>,
    pub order_num: i32,
    pub status: HelpStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpImageParams {
    pub url: String,
    pub caption: String,
    pub order_num: Option<i32>,
}

#[async_trait]
pub trait HelpRepo: Send + Sync {
    async fn list_categories(
        &self,
        visibility: Visibility,
    ) -> Result<Vec<HelpCategorySummary>, RepoError>;

    async fn find_category(&self, id: i64) -> Result<Option<HelpCategory>, RepoError>;

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<HelpCategory>, RepoError>;

    async fn list_articles(
        &self,
        category_id: Option<i64>,
        visibility: Visibility,
    ) -> Result<Vec<HelpArticle>, RepoError>;

    async fn find_article(&self, id: i64) -> Result<Option<HelpArticle>, RepoError>;

    async fn find_article_by_slug(&self, slug: &str) -> Result<Option<HelpArticle>, RepoError>;

    /// Published articles whose title, summary or content contain `needle`.
    async fn search_articles(&self, needle: &str) -> Result<Vec<HelpArticle>, RepoError>;

    async fn list_images(&self, article_id: i64) -> Result<Vec<HelpImage>, RepoError>;
}

#[async_trait]
pub trait HelpWriteRepo: Send + Sync {
    async fn create_category(&self, params: &HelpCategoryParams)
    -> Result<HelpCategory, RepoError>;

    async fn update_category(
        &self,
        id: i64,
        params: &HelpCategoryParams,
    ) -> Result<Option<HelpCategory>, RepoError>;

    /// Delete a category together with its articles and their images.
    async fn delete_category_cascade(&self, id: i64) -> Result<bool, RepoError>;

    async fn create_article(&self, params: &HelpArticleParams) -> Result<HelpArticle, RepoError>;

    async fn update_article(
        &self,
        id: i64,
        params: &HelpArticleParams,
    ) -> Result<Option<HelpArticle>, RepoError>;

    async fn delete_article(&self, id: i64) -> Result<bool, RepoError>;

    async fn increment_article_views(&self, id: i64) -> Result<(), RepoError>;

    async fn add_image(
        &self,
        article_id: i64,
        params: &HelpImageParams,
    ) -> Result<HelpImage, RepoError>;

    async fn update_image(
        &self,
        id: i64,
        params: &HelpImageParams,
    ) -> Result<Option<HelpImage>, RepoError>;

    async fn delete_image(&self, id: i64) -> Result<bool, RepoError>;

    /// Renumber an article's images to follow `image_ids`. The ids must be
    /// exactly the article's current images.
    async fn reorder_images(
        &self,
        article_id: i64,
        image_ids: &[i64],
    ) -> Result<Vec<HelpImage>, RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError>;

    async fn upsert_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUserRecord, RepoError>;
}
