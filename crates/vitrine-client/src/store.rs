//! Client-side snapshot of the public façade.
//!
//! `SiteStore` loads every family at once into an immutable `SiteSnapshot`
//! and swaps it in atomically. Reads are pure projections over the current
//! snapshot; writes go to the admin API and trigger a full refresh.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use vitrine_api_types::content::{ContentMap, SettingsMap, decode_quick_links};
use vitrine_api_types::{
    Banner, BannerFields, BatchUpdated, HelpCategorySummary, NewSegment,
    NewSolution, NewSolutionPage, NewStat, QuickLink, Segment, SegmentFields, Solution,
    SolutionFields, SolutionPage, SolutionPageFields, Stat, StatFields, UploadResponse,
};

use crate::client::SiteClient;
use crate::error::{ClientError, UpstreamError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, nothing fetched yet.
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSnapshot {
    pub content: ContentMap,
    pub settings: SettingsMap,
    pub solutions: Vec<Solution>,
    pub segments: Vec<Segment>,
    pub stats: Vec<Stat>,
    pub banners: Vec<Banner>,
    pub solution_pages: Vec<SolutionPage>,
    pub help_categories: Vec<HelpCategorySummary>,
    /// Families that failed to load and hold their empty default.
    pub degraded: Vec<UpstreamError>,
}

impl SiteSnapshot {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Active banners scoped to `page`; a blank page means the home page.
    pub fn banners_for_page(&self, page: &str) -> Vec<&Banner> {
        self.banners
            .iter()
            .filter(|banner| banner.is_visible_on(page))
            .collect()
    }

    pub fn stats_by_section(&self) -> BTreeMap<&str, Vec<&Stat>> {
        let mut sections: BTreeMap<&str, Vec<&Stat>> = BTreeMap::new();
        for stat in &self.stats {
            sections
                .entry(stat.fields.section.as_str())
                .or_default()
                .push(stat);
        }
        sections
    }

    pub fn quick_links(&self) -> Vec<QuickLink> {
        decode_quick_links(&self.content)
    }

    pub fn content(&self, key: &str) -> Option<&str> {
        self.content.get(key).map(String::as_str)
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn solution(&self, solution_id: &str) -> Option<&Solution> {
        self.solutions
            .iter()
            .find(|solution| solution.solution_id == solution_id)
    }

    pub fn segment(&self, segment_id: &str) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|segment| segment.segment_id == segment_id)
    }

    pub fn solution_page(&self, slug: &str) -> Option<&SolutionPage> {
        self.solution_pages.iter().find(|page| page.slug == slug)
    }
}

struct StoreState {
    phase: Phase,
    snapshot: Arc<SiteSnapshot>,
}

pub struct SiteStore {
    client: SiteClient,
    state: RwLock<StoreState>,
    /// Held for a whole load so snapshots publish in the order loads start.
    loading: Mutex<()>,
}

impl SiteStore {
    pub fn new(client: SiteClient) -> Self {
        Self {
            client,
            state: RwLock::new(StoreState {
                phase: Phase::Idle,
                snapshot: Arc::new(SiteSnapshot::default()),
            }),
            loading: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &SiteClient {
        &self.client
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase
    }

    pub async fn snapshot(&self) -> Arc<SiteSnapshot> {
        self.state.read().await.snapshot.clone()
    }

    /// Load every family concurrently and publish the result. A failing
    /// family is replaced by its empty default and listed in `degraded`.
    /// Overlapping calls run one after another.
    pub async fn fetch_all(&self) -> Arc<SiteSnapshot> {
        let _loading = self.loading.lock().await;
        self.state.write().await.phase = Phase::Loading;

        let client = &self.client;
        let (
            content,
            settings,
            solutions,
            segments,
            stats,
            banners,
            solution_pages,
            help_categories,
        ) = tokio::join!(
            client.content(),
            client.settings(),
            client.solutions(),
            client.segments(),
            client.stats(),
            client.all_banners(),
            client.solution_pages(),
            client.help_categories(),
        );

        let mut degraded = Vec::new();
        let snapshot = Arc::new(SiteSnapshot {
            content: settle("content", content, &mut degraded),
            settings: settle("settings", settings, &mut degraded),
            solutions: settle("solutions", solutions, &mut degraded),
            segments: settle("segments", segments, &mut degraded),
            stats: settle("stats", stats, &mut degraded),
            banners: settle("banners", banners, &mut degraded),
            solution_pages: settle("solution_pages", solution_pages, &mut degraded),
            help_categories: settle("help_categories", help_categories, &mut degraded),
            degraded,
        });

        let mut state = self.state.write().await;
        state.snapshot = snapshot.clone();
        state.phase = Phase::Ready;
        debug!(
            target = "vitrine_client::store",
            degraded = snapshot.degraded.len(),
            "snapshot published"
        );
        snapshot
    }

    pub async fn refresh(&self) -> Arc<SiteSnapshot> {
        self.fetch_all().await
    }

    async fn refreshed<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        let value = result?;
        self.refresh().await;
        Ok(value)
    }

    pub async fn update_content(&self, batch: &ContentMap) -> Result<BatchUpdated, ClientError> {
        self.refreshed(self.client.update_content(batch).await)
            .await
    }

    pub async fn update_settings(&self, batch: &SettingsMap) -> Result<BatchUpdated, ClientError> {
        self.refreshed(self.client.update_settings(batch).await)
            .await
    }

    pub async fn save_quick_links(
        &self,
        links: &[QuickLink],
    ) -> Result<Vec<QuickLink>, ClientError> {
        self.refreshed(self.client.save_quick_links(links).await)
            .await
    }

    pub async fn create_solution(&self, input: &NewSolution) -> Result<Solution, ClientError> {
        self.refreshed(self.client.create_solution(input).await)
            .await
    }

    pub async fn update_solution(
        &self,
        solution_id: &str,
        fields: &SolutionFields,
    ) -> Result<Solution, ClientError> {
        self.refreshed(self.client.update_solution(solution_id, fields).await)
            .await
    }

    pub async fn delete_solution(&self, solution_id: &str) -> Result<(), ClientError> {
        self.refreshed(self.client.delete_solution(solution_id).await)
            .await
    }

    /// Update when the snapshot knows `solution_id`, create otherwise.
    pub async fn save_solution(&self, input: &NewSolution) -> Result<Solution, ClientError> {
        let known = self.snapshot().await.solution(&input.solution_id).is_some();
        if known {
            self.update_solution(&input.solution_id, &input.fields)
                .await
        } else {
            self.create_solution(input).await
        }
    }

    pub async fn create_segment(&self, input: &NewSegment) -> Result<Segment, ClientError> {
        self.refreshed(self.client.create_segment(input).await)
            .await
    }

    pub async fn update_segment(
        &self,
        segment_id: &str,
        fields: &SegmentFields,
    ) -> Result<Segment, ClientError> {
        self.refreshed(self.client.update_segment(segment_id, fields).await)
            .await
    }

    pub async fn delete_segment(&self, segment_id: &str) -> Result<(), ClientError> {
        self.refreshed(self.client.delete_segment(segment_id).await)
            .await
    }

    /// Update when the snapshot knows `segment_id`, create otherwise.
    pub async fn save_segment(&self, input: &NewSegment) -> Result<Segment, ClientError> {
        let known = self.snapshot().await.segment(&input.segment_id).is_some();
        if known {
            self.update_segment(&input.segment_id, &input.fields).await
        } else {
            self.create_segment(input).await
        }
    }

    pub async fn create_stat(&self, input: &NewStat) -> Result<Stat, ClientError> {
        self.refreshed(self.client.create_stat(input).await).await
    }

    pub async fn update_stat(
        &self,
        stat_id: &str,
        fields: &StatFields,
    ) -> Result<Stat, ClientError> {
        self.refreshed(self.client.update_stat(stat_id, fields).await)
            .await
    }

    pub async fn delete_stat(&self, stat_id: &str) -> Result<(), ClientError> {
        self.refreshed(self.client.delete_stat(stat_id).await).await
    }

    pub async fn create_banner(&self, fields: &BannerFields) -> Result<Banner, ClientError> {
        self.refreshed(self.client.create_banner(fields).await)
            .await
    }

    pub async fn update_banner(
        &self,
        id: i64,
        fields: &BannerFields,
    ) -> Result<Banner, ClientError> {
        self.refreshed(self.client.update_banner(id, fields).await)
            .await
    }

    pub async fn delete_banner(&self, id: i64) -> Result<(), ClientError> {
        self.refreshed(self.client.delete_banner(id).await).await
    }

    pub async fn create_solution_page(
        &self,
        input: &NewSolutionPage,
    ) -> Result<SolutionPage, ClientError> {
        self.refreshed(self.client.create_solution_page(input).await)
            .await
    }

    pub async fn update_solution_page(
        &self,
        slug: &str,
        fields: &SolutionPageFields,
    ) -> Result<SolutionPage, ClientError> {
        self.refreshed(self.client.update_solution_page(slug, fields).await)
            .await
    }

    pub async fn delete_solution_page(&self, slug: &str) -> Result<(), ClientError> {
        self.refreshed(self.client.delete_solution_page(slug).await)
            .await
    }

    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        self.refreshed(self.client.upload(file_name, bytes).await)
            .await
    }

    pub async fn upload_file(&self, path: &Path) -> Result<UploadResponse, ClientError> {
        self.refreshed(self.client.upload_file(path).await).await
    }
}

fn settle<T: Default>(
    family: &'static str,
    result: Result<T, ClientError>,
    degraded: &mut Vec<UpstreamError>,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            let upstream = UpstreamError {
                family,
                message: err.to_string(),
            };
            warn!(
                target = "vitrine_client::store",
                family,
                error = %upstream,
                "family degraded to its empty default"
            );
            degraded.push(upstream);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banner(id: i64, page: Option<&str>) -> Banner {
        Banner {
            id,
            fields: BannerFields {
                title: format!("b{id}"),
                page: page.map(str::to_string),
                active: true,
                ..BannerFields::default()
            },
        }
    }

    fn stat(stat_id: &str, section: &str) -> Stat {
        Stat {
            id: 1,
            stat_id: stat_id.to_string(),
            fields: StatFields {
                value: "1".to_string(),
                label: stat_id.to_string(),
                section: section.to_string(),
                order_num: 0,
            },
        }
    }

    #[test]
    fn banners_for_page_treats_missing_page_as_home() {
        let mut hidden = banner(4, Some("sobre"));
        hidden.fields.active = false;
        let snapshot = SiteSnapshot {
            banners: vec![
                banner(1, Some("home")),
                banner(2, None),
                banner(3, Some("sobre")),
                hidden,
            ],
            ..SiteSnapshot::default()
        };

        let home: Vec<i64> = snapshot.banners_for_page("home").iter().map(|b| b.id).collect();
        assert_eq!(home, [1, 2]);
        let blank: Vec<i64> = snapshot.banners_for_page(" ").iter().map(|b| b.id).collect();
        assert_eq!(blank, [1, 2]);
        let about: Vec<i64> = snapshot.banners_for_page(" sobre ").iter().map(|b| b.id).collect();
        assert_eq!(about, [3]);
        assert!(snapshot.banners_for_page("contato").is_empty());
    }

    #[test]
    fn stats_group_by_section_in_order() {
        let snapshot = SiteSnapshot {
            stats: vec![
                stat("a", "numbers"),
                stat("b", "about"),
                stat("c", "numbers"),
            ],
            ..SiteSnapshot::default()
        };

        let sections = snapshot.stats_by_section();
        let numbers: Vec<&str> = sections["numbers"]
            .iter()
            .map(|s| s.stat_id.as_str())
            .collect();
        assert_eq!(numbers, ["a", "c"]);
        assert_eq!(sections["about"].len(), 1);
    }

    #[test]
    fn empty_snapshot_serves_default_quick_links() {
        let snapshot = SiteSnapshot::default();
        assert_eq!(snapshot.quick_links().len(), 4);
        assert!(snapshot.content("hero.title").is_none());
        assert!(!snapshot.is_degraded());
    }

    #[tokio::test]
    async fn new_store_is_idle_with_empty_snapshot() {
        let client = SiteClient::new("http://127.0.0.1:9").expect("client");
        let store = SiteStore::new(client);
        assert_eq!(store.phase().await, Phase::Idle);
        assert_eq!(*store.snapshot().await, SiteSnapshot::default());
    }
}
