use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{entity} `{key}` already exists")]
    Duplicate { entity: &'static str, key: String },
    #[error("{entity} `{key}` not found")]
    NotFound { entity: &'static str, key: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl AdminError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Translate a unique-constraint violation into a duplicate of `key`.
    pub fn from_write(entity: &'static str, key: &str, err: RepoError) -> Self {
        match err {
            RepoError::Duplicate { .. } => Self::Duplicate {
                entity,
                key: key.to_string(),
            },
            RepoError::NotFound => Self::not_found(entity, key),
            other => Self::Repo(other),
        }
    }
}

/// Trim `value` and fail with `MissingField` when nothing is left.
pub(crate) fn required(value: &str, field: &'static str) -> Result<String, AdminError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AdminError::missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("  erp ", "solution_id").expect("value"), "erp");
        assert!(matches!(
            required(" \t", "title"),
            Err(AdminError::MissingField { field: "title" })
        ));
    }

    #[test]
    fn duplicate_constraint_names_the_business_key() {
        let err = AdminError::from_write(
            "solution",
            "erp",
            RepoError::Duplicate {
                constraint: "solutions_solution_id_key".into(),
            },
        );
        assert_eq!(err.to_string(), "solution `erp` already exists");
    }
}
