use std::sync::Arc;

use crate::application::repos::{SegmentsRepo, Visibility};
use crate::domain::entities::{NewSegment, Segment, SegmentFields};

use super::error::required;
use super::{AdminError, record_mutation};

const ENTITY: &str = "segment";

#[derive(Clone)]
pub struct AdminSegmentService {
    repo: Arc<dyn SegmentsRepo>,
}

impl AdminSegmentService {
    pub fn new(repo: Arc<dyn SegmentsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Segment>, AdminError> {
        Ok(self.repo.list_segments(Visibility::All).await?)
    }

    pub async fn create(&self, actor: &str, input: NewSegment) -> Result<Segment, AdminError> {
        let segment_id = required(&input.segment_id, "segment_id")?;
        let mut fields = input.fields;
        fields.name = required(&fields.name, "name")?;

        let created = self
            .repo
            .create_segment(&NewSegment {
                segment_id: segment_id.clone(),
                fields,
            })
            .await
            .map_err(|err| AdminError::from_write(ENTITY, &segment_id, err))?;
        record_mutation(actor, "segments", "create", &segment_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &str,
        segment_id: &str,
        mut fields: SegmentFields,
    ) -> Result<Segment, AdminError> {
        let segment_id = required(segment_id, "segment_id")?;
        fields.name = required(&fields.name, "name")?;

        let updated = self
            .repo
            .update_segment(&segment_id, &fields)
            .await?
            .ok_or_else(|| AdminError::not_found(ENTITY, &segment_id))?;
        record_mutation(actor, "segments", "update", &segment_id);
        Ok(updated)
    }

    pub async fn delete(&self, actor: &str, segment_id: &str) -> Result<(), AdminError> {
        let segment_id = segment_id.trim();
        if !self.repo.delete_segment(segment_id).await? {
            return Err(AdminError::not_found(ENTITY, segment_id));
        }
        record_mutation(actor, "segments", "delete", segment_id);
        Ok(())
    }
}
