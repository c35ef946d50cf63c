use async_trait::async_trait;

use crate::{
    application::repos::{RepoError, UsersRepo},
    domain::entities::AdminUserRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct AdminUserRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
}

impl From<AdminUserRow> for AdminUserRecord {
    fn from(row: AdminUserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl UsersRepo for PostgresRepositories {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            "SELECT id, email, name, password_hash FROM admin_users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(AdminUserRecord::from))
    }

    async fn upsert_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUserRecord, RepoError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r#"
            INSERT INTO admin_users (email, name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                password_hash = EXCLUDED.password_hash
            RETURNING id, email, name, password_hash
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(AdminUserRecord::from(row))
    }
}
