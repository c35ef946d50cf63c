//! Aggregate read of every entity family for the admin dashboard.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::application::repos::{
    BannersRepo, ContentRepo, HelpRepo, RepoError, SegmentsRepo, SettingsRepo, SolutionPagesRepo,
    SolutionsRepo, StatsRepo, Visibility,
};
use vitrine_api_types::AllData;
use vitrine_api_types::content::fold_entries;

/// One or more families could not be loaded. Every failure is listed.
#[derive(Debug, Error)]
#[error("failed to load {}", .families.join(", "))]
pub struct AllDataError {
    pub families: Vec<&'static str>,
    pub causes: Vec<String>,
}

impl AllDataError {
    fn push(&mut self, family: &'static str, err: RepoError) {
        error!(
            target = "vitrine::admin::dashboard",
            family,
            error = %err,
            "family load failed"
        );
        self.families.push(family);
        self.causes.push(format!("{family}: {err}"));
    }
}

#[derive(Clone)]
pub struct AdminDashboardService {
    content: Arc<dyn ContentRepo>,
    settings: Arc<dyn SettingsRepo>,
    solutions: Arc<dyn SolutionsRepo>,
    segments: Arc<dyn SegmentsRepo>,
    stats: Arc<dyn StatsRepo>,
    banners: Arc<dyn BannersRepo>,
    solution_pages: Arc<dyn SolutionPagesRepo>,
    help: Arc<dyn HelpRepo>,
}

macro_rules! take {
    ($failures:ident, $family:literal, $result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $failures.push($family, err);
                Default::default()
            }
        }
    };
}

impl AdminDashboardService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        content: Arc<dyn ContentRepo>,
        settings: Arc<dyn SettingsRepo>,
        solutions: Arc<dyn SolutionsRepo>,
        segments: Arc<dyn SegmentsRepo>,
        stats: Arc<dyn StatsRepo>,
        banners: Arc<dyn BannersRepo>,
        solution_pages: Arc<dyn SolutionPagesRepo>,
        help: Arc<dyn HelpRepo>,
    ) -> Self {
        Self {
            content,
            settings,
            solutions,
            segments,
            stats,
            banners,
            solution_pages,
            help,
        }
    }

    /// Load every family concurrently, inactive and draft rows included.
    pub async fn all_data(&self) -> Result<AllData, AllDataError> {
        let (
            content,
            settings,
            solutions,
            segments,
            stats,
            banners,
            solution_pages,
            help_categories,
            help_articles,
        ) = tokio::join!(
            self.content.list_content(),
            self.settings.list_settings(),
            self.solutions.list_solutions(Visibility::All),
            self.segments.list_segments(Visibility::All),
            self.stats.list_stats(),
            self.banners.list_all_banners(None),
            self.solution_pages.list_solution_pages(Visibility::All),
            self.help.list_categories(Visibility::All),
            self.help.list_articles(None, Visibility::All),
        );

        let mut failures = AllDataError {
            families: Vec::new(),
            causes: Vec::new(),
        };

        let content = take!(failures, "content", content);
        let settings: Vec<_> = take!(failures, "settings", settings);
        let solutions = take!(failures, "solutions", solutions);
        let segments = take!(failures, "segments", segments);
        let stats = take!(failures, "stats", stats);
        let banners = take!(failures, "banners", banners);
        let solution_pages = take!(failures, "solution_pages", solution_pages);
        let help_categories: Vec<_> = take!(failures, "help_categories", help_categories);
        let help_articles = take!(failures, "help_articles", help_articles);

        if !failures.families.is_empty() {
            return Err(failures);
        }

        Ok(AllData {
            content,
            settings: fold_entries(settings.into_iter().map(|row| (row.key, row.value))),
            solutions,
            segments,
            stats,
            banners,
            solution_pages,
            help_categories: help_categories
                .into_iter()
                .map(|summary| summary.category)
                .collect(),
            help_articles,
        })
    }
}
