use async_trait::async_trait;

use crate::{
    application::repos::{RepoError, SolutionsRepo, Visibility},
    domain::{
        entities::{NewSolution, Solution, SolutionFields},
        lists::{decode_list, encode_list},
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const SOLUTION_COLUMNS: &str =
    "id, solution_id, title, description, features, cta_text, icon, order_num, active";

#[derive(sqlx::FromRow)]
struct SolutionRow {
    id: i64,
    solution_id: String,
    title: String,
    description: String,
    features: String,
    cta_text: String,
    icon: String,
    order_num: i32,
    active: bool,
}

impl From<SolutionRow> for Solution {
    fn from(row: SolutionRow) -> Self {
        Self {
            id: row.id,
            solution_id: row.solution_id,
            fields: SolutionFields {
                title: row.title,
                description: row.description,
                features: decode_list("solutions.features", &row.features),
                cta_text: row.cta_text,
                icon: row.icon,
                order_num: row.order_num,
                active: row.active,
            },
        }
    }
}

#[async_trait]
impl SolutionsRepo for PostgresRepositories {
    async fn list_solutions(&self, visibility: Visibility) -> Result<Vec<Solution>, RepoError> {
        let sql = format!(
            "SELECT {SOLUTION_COLUMNS} FROM solutions {} ORDER BY order_num, id",
            Self::active_filter(visibility)
        );
        let rows = sqlx::query_as::<_, SolutionRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Solution::from).collect())
    }

    async fn create_solution(&self, solution: &NewSolution) -> Result<Solution, RepoError> {
        let fields = &solution.fields;
        let sql = format!(
            r#"
            INSERT INTO solutions
                (solution_id, title, description, features, cta_text, icon, order_num, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SOLUTION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SolutionRow>(&sql)
            .bind(&solution.solution_id)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(encode_list(&fields.features))
            .bind(&fields.cta_text)
            .bind(&fields.icon)
            .bind(fields.order_num)
            .bind(fields.active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(Solution::from(row))
    }

    async fn update_solution(
        &self,
        solution_id: &str,
        fields: &SolutionFields,
    ) -> Result<Option<Solution>, RepoError> {
        let sql = format!(
            r#"
            UPDATE solutions SET
                title = $2,
                description = $3,
                features = $4,
                cta_text = $5,
                icon = $6,
                order_num = $7,
                active = $8,
                updated_at = now()
            WHERE solution_id = $1
            RETURNING {SOLUTION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SolutionRow>(&sql)
            .bind(solution_id)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(encode_list(&fields.features))
            .bind(&fields.cta_text)
            .bind(&fields.icon)
            .bind(fields.order_num)
            .bind(fields.active)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Solution::from))
    }

    async fn delete_solution(&self, solution_id: &str) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM solutions WHERE solution_id = $1")
            .bind(solution_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
