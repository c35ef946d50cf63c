//! Service-level behaviour against in-memory repositories.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vitrine::application::admin::AdminError;
use vitrine::application::admin::content::AdminContentService;
use vitrine::application::admin::dashboard::AdminDashboardService;
use vitrine::application::repos::{
    BannersRepo, ContentRepo, HelpArticleParams, HelpCategoryParams, HelpImageParams, HelpRepo,
    HelpWriteRepo, RepoError, SegmentsRepo, SettingsRepo, SolutionPagesRepo, SolutionsRepo,
    StatsRepo, Visibility,
};
use vitrine::application::site::{SiteRepos, SiteService};
use vitrine::domain::entities::{
    Banner, BannerFields, BannerPageCount, ContentEntry, HelpArticle, HelpCategory,
    HelpCategorySummary, HelpImage, NewSegment, NewSolution, NewSolutionPage, NewStat, Segment,
    SegmentFields, SettingEntry, Solution, SolutionFields, SolutionPage, SolutionPageFields, Stat,
    StatFields,
};
use vitrine::domain::error::DomainError;
use vitrine::domain::keys::ContentUpsert;

#[derive(Default)]
struct MemoryRepos {
    failing: BTreeSet<&'static str>,
    content: Mutex<BTreeMap<String, ContentUpsert>>,
    upsert_calls: Mutex<usize>,
    banner_pages: Mutex<Vec<String>>,
}

impl MemoryRepos {
    fn failing(families: &[&'static str]) -> Self {
        Self {
            failing: families.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn check(&self, family: &'static str) -> Result<(), RepoError> {
        if self.failing.contains(family) {
            Err(RepoError::Persistence(format!("{family} table unavailable")))
        } else {
            Ok(())
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().expect("fake repo lock")
}

#[async_trait]
impl ContentRepo for MemoryRepos {
    async fn list_content(&self) -> Result<Vec<ContentEntry>, RepoError> {
        self.check("content")?;
        Ok(lock(&self.content)
            .values()
            .map(|row| ContentEntry {
                key: row.key.clone(),
                section: row.section.clone(),
                value: row.value.clone(),
                kind: "text".to_string(),
            })
            .collect())
    }

    async fn upsert_content(&self, rows: &[ContentUpsert]) -> Result<(), RepoError> {
        *lock(&self.upsert_calls) += 1;
        let mut content = lock(&self.content);
        for row in rows {
            content.insert(row.key.clone(), row.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsRepo for MemoryRepos {
    async fn list_settings(&self) -> Result<Vec<SettingEntry>, RepoError> {
        self.check("settings")?;
        Ok(Vec::new())
    }

    async fn upsert_settings(&self, _pairs: &[(String, String)]) -> Result<(), RepoError> {
        *lock(&self.upsert_calls) += 1;
        Ok(())
    }
}

#[async_trait]
impl SolutionsRepo for MemoryRepos {
    async fn list_solutions(&self, _visibility: Visibility) -> Result<Vec<Solution>, RepoError> {
        self.check("solutions")?;
        Ok(Vec::new())
    }

    async fn create_solution(&self, _solution: &NewSolution) -> Result<Solution, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_solution(
        &self,
        _solution_id: &str,
        _fields: &SolutionFields,
    ) -> Result<Option<Solution>, RepoError> {
        Ok(None)
    }

    async fn delete_solution(&self, _solution_id: &str) -> Result<bool, RepoError> {
        Ok(false)
    }
}

#[async_trait]
impl SegmentsRepo for MemoryRepos {
    async fn list_segments(&self, _visibility: Visibility) -> Result<Vec<Segment>, RepoError> {
        self.check("segments")?;
        Ok(Vec::new())
    }

    async fn create_segment(&self, _segment: &NewSegment) -> Result<Segment, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_segment(
        &self,
        _segment_id: &str,
        _fields: &SegmentFields,
    ) -> Result<Option<Segment>, RepoError> {
        Ok(None)
    }

    async fn delete_segment(&self, _segment_id: &str) -> Result<bool, RepoError> {
        Ok(false)
    }
}

#[async_trait]
impl StatsRepo for MemoryRepos {
    async fn list_stats(&self) -> Result<Vec<Stat>, RepoError> {
        self.check("stats")?;
        Ok(Vec::new())
    }

    async fn create_stat(&self, _stat: &NewStat) -> Result<Stat, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_stat(
        &self,
        _stat_id: &str,
        _fields: &StatFields,
    ) -> Result<Option<Stat>, RepoError> {
        Ok(None)
    }

    async fn delete_stat(&self, _stat_id: &str) -> Result<bool, RepoError> {
        Ok(false)
    }
}

#[async_trait]
impl BannersRepo for MemoryRepos {
    async fn list_banners_for_page(&self, page: &str) -> Result<Vec<Banner>, RepoError> {
        lock(&self.banner_pages).push(page.to_string());
        Ok(Vec::new())
    }

    async fn list_active_banners(&self) -> Result<Vec<Banner>, RepoError> {
        Ok(Vec::new())
    }

    async fn list_all_banners(&self, _page: Option<&str>) -> Result<Vec<Banner>, RepoError> {
        self.check("banners")?;
        Ok(Vec::new())
    }

    async fn banner_page_counts(&self) -> Result<Vec<BannerPageCount>, RepoError> {
        Ok(Vec::new())
    }

    async fn find_banner(&self, _id: i64) -> Result<Option<Banner>, RepoError> {
        Ok(None)
    }

    async fn create_banner(&self, _fields: &BannerFields) -> Result<Banner, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_banner(
        &self,
        _id: i64,
        _fields: &BannerFields,
    ) -> Result<Option<Banner>, RepoError> {
        Ok(None)
    }

    async fn deactivate_banner(&self, _id: i64) -> Result<bool, RepoError> {
        Ok(false)
    }
}

#[async_trait]
impl SolutionPagesRepo for MemoryRepos {
    async fn list_solution_pages(
        &self,
        _visibility: Visibility,
    ) -> Result<Vec<SolutionPage>, RepoError> {
        self.check("solution_pages")?;
        Ok(Vec::new())
    }

    async fn find_solution_page(&self, _slug: &str) -> Result<Option<SolutionPage>, RepoError> {
        Ok(None)
    }

    async fn create_solution_page(
        &self,
        _page: &NewSolutionPage,
    ) -> Result<SolutionPage, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_solution_page(
        &self,
        _slug: &str,
        _fields: &SolutionPageFields,
    ) -> Result<Option<SolutionPage>, RepoError> {
        Ok(None)
    }

    async fn delete_solution_page(&self, _slug: &str) -> Result<bool, RepoError> {
        Ok(false)
    }
}

#[async_trait]
impl HelpRepo for MemoryRepos {
    async fn list_categories(
        &self,
        _visibility: Visibility,
    ) -> Result<Vec<HelpCategorySummary>, RepoError> {
        self.check("help_categories")?;
        Ok(Vec::new())
    }

    async fn find_category(&self, _id: i64) -> Result<Option<HelpCategory>, RepoError> {
        Ok(None)
    }

    async fn find_category_by_slug(
        &self,
        _slug: &str,
    ) -> Result<Option<HelpCategory>, RepoError> {
        Ok(None)
    }

    async fn list_articles(
        &self,
        _category_id: Option<i64>,
        _visibility: Visibility,
    ) -> Result<Vec<HelpArticle>, RepoError> {
        self.check("help_articles")?;
        Ok(Vec::new())
    }

    async fn find_article(&self, _id: i64) -> Result<Option<HelpArticle>, RepoError> {
        Ok(None)
    }

    async fn find_article_by_slug(&self, _slug: &str) -> Result<Option<HelpArticle>, RepoError> {
        Ok(None)
    }

    async fn search_articles(&self, _needle: &str) -> Result<Vec<HelpArticle>, RepoError> {
        Ok(Vec::new())
    }

    async fn list_images(&self, _article_id: i64) -> Result<Vec<HelpImage>, RepoError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl HelpWriteRepo for MemoryRepos {
    async fn create_category(
        &self,
        _params: &HelpCategoryParams,
    ) -> Result<HelpCategory, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_category(
        &self,
        _id: i64,
        _params: &HelpCategoryParams,
    ) -> Result<Option<HelpCategory>, RepoError> {
        Ok(None)
    }

    async fn delete_category_cascade(&self, _id: i64) -> Result<bool, RepoError> {
        Ok(false)
    }

    async fn create_article(&self, _params: &HelpArticleParams) -> Result<HelpArticle, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_article(
        &self,
        _id: i64,
        _params: &HelpArticleParams,
    ) -> Result<Option<HelpArticle>, RepoError> {
        Ok(None)
    }

    async fn delete_article(&self, _id: i64) -> Result<bool, RepoError> {
        Ok(false)
    }

    async fn increment_article_views(&self, _id: i64) -> Result<(), RepoError> {
        Ok(())
    }

    async fn add_image(
        &self,
        _article_id: i64,
        _params: &HelpImageParams,
    ) -> Result<HelpImage, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_image(
        &self,
        _id: i64,
        _params: &HelpImageParams,
    ) -> Result<Option<HelpImage>, RepoError> {
        Ok(None)
    }

    async fn delete_image(&self, _id: i64) -> Result<bool, RepoError> {
        Ok(false)
    }

    async fn reorder_images(
        &self,
        _article_id: i64,
        _image_ids: &[i64],
    ) -> Result<Vec<HelpImage>, RepoError> {
        Ok(Vec::new())
    }
}

fn dashboard(repos: Arc<MemoryRepos>) -> AdminDashboardService {
    AdminDashboardService::new(
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos,
    )
}

fn site(repos: Arc<MemoryRepos>) -> SiteService {
    SiteService::new(SiteRepos {
        content: repos.clone(),
        settings: repos.clone(),
        solutions: repos.clone(),
        segments: repos.clone(),
        stats: repos.clone(),
        banners: repos.clone(),
        solution_pages: repos.clone(),
        help: repos.clone(),
        help_writer: repos,
    })
}

#[tokio::test]
async fn invalid_key_prevents_any_write() {
    let repos = Arc::new(MemoryRepos::default());
    let service = AdminContentService::new(repos.clone(), repos.clone());

    let batch = BTreeMap::from([
        ("hero.title".to_string(), "Acme".to_string()),
        ("bad\nkey".to_string(), "x".to_string()),
        ("trailing ".to_string(), "x".to_string()),
    ]);
    let err = service
        .save_content("tester", batch)
        .await
        .expect_err("invalid batch");

    match err {
        AdminError::Domain(DomainError::InvalidKeys { keys }) => assert_eq!(keys.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(*lock(&repos.upsert_calls), 0);
    assert!(lock(&repos.content).is_empty());
}

#[tokio::test]
async fn empty_batches_skip_the_store() {
    let repos = Arc::new(MemoryRepos::default());
    let service = AdminContentService::new(repos.clone(), repos.clone());

    assert_eq!(
        service
            .save_content("tester", BTreeMap::new())
            .await
            .expect("empty content"),
        0
    );
    assert_eq!(
        service
            .save_settings("tester", BTreeMap::new())
            .await
            .expect("empty settings"),
        0
    );
    assert_eq!(*lock(&repos.upsert_calls), 0);
}

#[tokio::test]
async fn quick_links_always_write_every_slot() {
    let repos = Arc::new(MemoryRepos::default());
    let service = AdminContentService::new(repos.clone(), repos.clone());

    let saved = service
        .save_quick_links(
            "tester",
            vec![vitrine_api_types::QuickLink::new(" Blog ", " /blog ")],
        )
        .await
        .expect("save quick links");

    assert_eq!(saved, vec![vitrine_api_types::QuickLink::new("Blog", "/blog")]);
    let content = lock(&repos.content);
    assert_eq!(content.len(), 16);
    assert!(content.values().all(|row| row.section == "quick_links"));
    assert_eq!(
        content.get("quick_links.1.label").map(|row| row.value.as_str()),
        Some("")
    );
}

#[tokio::test]
async fn all_data_lists_every_failing_family() {
    let repos = Arc::new(MemoryRepos::failing(&["settings", "banners", "help_articles"]));

    let err = dashboard(repos).all_data().await.expect_err("partial load");
    assert_eq!(err.families, ["settings", "banners", "help_articles"]);
    assert_eq!(err.causes.len(), 3);
    assert!(err.to_string().contains("settings, banners, help_articles"));
}

#[tokio::test]
async fn all_data_succeeds_when_every_family_loads() {
    let repos = Arc::new(MemoryRepos::default());
    let data = dashboard(repos).all_data().await.expect("all data");
    assert!(data.content.is_empty());
    assert!(data.settings.is_empty());
    assert!(data.help_articles.is_empty());
}

#[tokio::test]
async fn blank_banner_page_reads_home() {
    let repos = Arc::new(MemoryRepos::default());
    let site = site(repos.clone());

    site.banners("").await.expect("blank");
    site.banners("  ").await.expect("whitespace");
    site.banners("sobre").await.expect("named page");

    assert_eq!(*lock(&repos.banner_pages), ["home", "home", "sobre"]);
}

#[tokio::test]
async fn blank_help_search_skips_the_store() {
    let repos = Arc::new(MemoryRepos::failing(&["help_articles"]));
    let hits = site(repos).search_help("   ").await.expect("blank search");
    assert!(hits.is_empty());
}
