//! Batch editing of site content, quick links and style settings.

use std::sync::Arc;

use crate::application::repos::{ContentRepo, SettingsRepo};
use crate::domain::entities::{ContentEntry, SettingEntry};
use crate::domain::keys::{content_batch, validate_batch};
use vitrine_api_types::QuickLink;
use vitrine_api_types::content::{
    ContentMap, SettingsMap, decode_quick_links, encode_quick_links, fold_entries,
};

use super::{AdminError, record_mutation};

#[derive(Clone)]
pub struct AdminContentService {
    content: Arc<dyn ContentRepo>,
    settings: Arc<dyn SettingsRepo>,
}

impl AdminContentService {
    pub fn new(content: Arc<dyn ContentRepo>, settings: Arc<dyn SettingsRepo>) -> Self {
        Self { content, settings }
    }

    pub async fn list_content(&self) -> Result<Vec<ContentEntry>, AdminError> {
        Ok(self.content.list_content().await?)
    }

    pub async fn list_settings(&self) -> Result<Vec<SettingEntry>, AdminError> {
        Ok(self.settings.list_settings().await?)
    }

    pub async fn settings_map(&self) -> Result<SettingsMap, AdminError> {
        let rows = self.settings.list_settings().await?;
        Ok(fold_entries(rows.into_iter().map(|row| (row.key, row.value))))
    }

    /// Upsert every pair of the batch. Nothing is written when any key is invalid.
    pub async fn save_content(&self, actor: &str, batch: ContentMap) -> Result<usize, AdminError> {
        let rows = content_batch(batch)?;
        if rows.is_empty() {
            return Ok(0);
        }

        self.content.upsert_content(&rows).await?;
        record_mutation(actor, "content", "upsert", &format!("{} keys", rows.len()));
        Ok(rows.len())
    }

    /// Persist the full slot set and return the links as the façade will serve them.
    pub async fn save_quick_links(
        &self,
        actor: &str,
        links: Vec<QuickLink>,
    ) -> Result<Vec<QuickLink>, AdminError> {
        let pairs = encode_quick_links(&links);
        let rows = content_batch(pairs)?;
        self.content.upsert_content(&rows).await?;
        record_mutation(actor, "quick_links", "upsert", &format!("{} links", links.len()));

        let written = fold_entries(rows.into_iter().map(|row| (row.key, row.value)));
        Ok(decode_quick_links(&written))
    }

    pub async fn save_settings(
        &self,
        actor: &str,
        batch: SettingsMap,
    ) -> Result<usize, AdminError> {
        validate_batch(batch.keys().map(String::as_str))?;
        if batch.is_empty() {
            return Ok(0);
        }

        let pairs: Vec<(String, String)> = batch.into_iter().collect();
        self.settings.upsert_settings(&pairs).await?;
        record_mutation(actor, "settings", "upsert", &format!("{} keys", pairs.len()));
        Ok(pairs.len())
    }
}
