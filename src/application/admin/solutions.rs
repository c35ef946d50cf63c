use std::sync::Arc;

use crate::application::repos::{SolutionsRepo, Visibility};
use crate::domain::entities::{NewSolution, Solution, SolutionFields};

use super::error::required;
use super::{AdminError, record_mutation};

const ENTITY: &str = "solution";

#[derive(Clone)]
pub struct AdminSolutionService {
    repo: Arc<dyn SolutionsRepo>,
}

impl AdminSolutionService {
    pub fn new(repo: Arc<dyn SolutionsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Solution>, AdminError> {
        Ok(self.repo.list_solutions(Visibility::All).await?)
    }

    pub async fn create(&self, actor: &str, input: NewSolution) -> Result<Solution, AdminError> {
        let solution_id = required(&input.solution_id, "solution_id")?;
        let fields = normalize(input.fields)?;
        let request = NewSolution {
            solution_id: solution_id.clone(),
            fields,
        };

        let created = self
            .repo
            .create_solution(&request)
            .await
            .map_err(|err| AdminError::from_write(ENTITY, &solution_id, err))?;
        record_mutation(actor, "solutions", "create", &solution_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &str,
        solution_id: &str,
        fields: SolutionFields,
    ) -> Result<Solution, AdminError> {
        let solution_id = required(solution_id, "solution_id")?;
        let fields = normalize(fields)?;

        let updated = self
            .repo
            .update_solution(&solution_id, &fields)
            .await?
            .ok_or_else(|| AdminError::not_found(ENTITY, &solution_id))?;
        record_mutation(actor, "solutions", "update", &solution_id);
        Ok(updated)
    }

    pub async fn delete(&self, actor: &str, solution_id: &str) -> Result<(), AdminError> {
        let solution_id = solution_id.trim();
        if !self.repo.delete_solution(solution_id).await? {
            return Err(AdminError::not_found(ENTITY, solution_id));
        }
        record_mutation(actor, "solutions", "delete", solution_id);
        Ok(())
    }
}

fn normalize(mut fields: SolutionFields) -> Result<SolutionFields, AdminError> {
    fields.title = required(&fields.title, "title")?;
    Ok(fields)
}
