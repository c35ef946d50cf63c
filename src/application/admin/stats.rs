use std::sync::Arc;

use crate::application::repos::StatsRepo;
use crate::domain::entities::{NewStat, Stat, StatFields};
use vitrine_api_types::catalog::DEFAULT_STAT_SECTION;

use super::error::required;
use super::{AdminError, record_mutation};

const ENTITY: &str = "stat";

#[derive(Clone)]
pub struct AdminStatService {
    repo: Arc<dyn StatsRepo>,
}

impl AdminStatService {
    pub fn new(repo: Arc<dyn StatsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Stat>, AdminError> {
        Ok(self.repo.list_stats().await?)
    }

    pub async fn create(&self, actor: &str, input: NewStat) -> Result<Stat, AdminError> {
        let stat_id = required(&input.stat_id, "stat_id")?;
        let fields = normalize(input.fields)?;

        let created = self
            .repo
            .create_stat(&NewStat {
                stat_id: stat_id.clone(),
                fields,
            })
            .await
            .map_err(|err| AdminError::from_write(ENTITY, &stat_id, err))?;
        record_mutation(actor, "stats", "create", &stat_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &str,
        stat_id: &str,
        fields: StatFields,
    ) -> Result<Stat, AdminError> {
        let stat_id = required(stat_id, "stat_id")?;
        let fields = normalize(fields)?;

        let updated = self
            .repo
            .update_stat(&stat_id, &fields)
            .await?
            .ok_or_else(|| AdminError::not_found(ENTITY, &stat_id))?;
        record_mutation(actor, "stats", "update", &stat_id);
        Ok(updated)
    }

    pub async fn delete(&self, actor: &str, stat_id: &str) -> Result<(), AdminError> {
        let stat_id = stat_id.trim();
        if !self.repo.delete_stat(stat_id).await? {
            return Err(AdminError::not_found(ENTITY, stat_id));
        }
        record_mutation(actor, "stats", "delete", stat_id);
        Ok(())
    }
}

fn normalize(mut fields: StatFields) -> Result<StatFields, AdminError> {
    fields.value = required(&fields.value, "value")?;
    fields.label = required(&fields.label, "label")?;
    if fields.section.trim().is_empty() {
        fields.section = DEFAULT_STAT_SECTION.to_string();
    }
    Ok(fields)
}
