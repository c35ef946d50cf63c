use std::sync::Arc;

use crate::application::repos::{SolutionPagesRepo, Visibility};
use crate::domain::entities::{NewSolutionPage, SolutionPage, SolutionPageFields};

use super::error::required;
use super::{AdminError, record_mutation};

const ENTITY: &str = "solution page";

#[derive(Clone)]
pub struct AdminSolutionPageService {
    repo: Arc<dyn SolutionPagesRepo>,
}

impl AdminSolutionPageService {
    pub fn new(repo: Arc<dyn SolutionPagesRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<SolutionPage>, AdminError> {
        Ok(self.repo.list_solution_pages(Visibility::All).await?)
    }

    pub async fn create(
        &self,
        actor: &str,
        input: NewSolutionPage,
    ) -> Result<SolutionPage, AdminError> {
        let slug = required(&input.slug, "slug")?;
        let fields = normalize(input.fields)?;

        let created = self
            .repo
            .create_solution_page(&NewSolutionPage {
                slug: slug.clone(),
                fields,
            })
            .await
            .map_err(|err| AdminError::from_write(ENTITY, &slug, err))?;
        record_mutation(actor, "solution_pages", "create", &slug);
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &str,
        slug: &str,
        fields: SolutionPageFields,
    ) -> Result<SolutionPage, AdminError> {
        let slug = required(slug, "slug")?;
        let fields = normalize(fields)?;

        let updated = self
            .repo
            .update_solution_page(&slug, &fields)
            .await?
            .ok_or_else(|| AdminError::not_found(ENTITY, &slug))?;
        record_mutation(actor, "solution_pages", "update", &slug);
        Ok(updated)
    }

    pub async fn delete(&self, actor: &str, slug: &str) -> Result<(), AdminError> {
        let slug = slug.trim();
        if !self.repo.delete_solution_page(slug).await? {
            return Err(AdminError::not_found(ENTITY, slug));
        }
        record_mutation(actor, "solution_pages", "delete", slug);
        Ok(())
    }
}

fn normalize(mut fields: SolutionPageFields) -> Result<SolutionPageFields, AdminError> {
    fields.title = required(&fields.title, "title")?;
    fields.solution_id = fields
        .solution_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    Ok(fields)
}
