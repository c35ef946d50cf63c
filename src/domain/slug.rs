//! Slugs for public help-center addresses.
//!
//! `slug::slugify` transliterates accented Latin text (`"Emissão de notas"`
//! becomes `emissao-de-notas`). Callers supply their own uniqueness predicate
//! so the generation logic stays free of persistence.

use std::future::Future;

use slug::slugify;
use thiserror::Error;

const MAX_SUFFIX_ATTEMPTS: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

#[derive(Debug, Error)]
pub enum SlugAsyncError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Produce a slug the predicate accepts, suffixing `-2`, `-3`, … on collision.
///
/// `is_unique` must return `true` when the candidate is free.
pub async fn generate_unique_slug_async<F, Fut, E>(
    input: &str,
    mut is_unique: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let base = derive_slug(input)?;

    if is_unique(&base).await.map_err(SlugAsyncError::Predicate)? {
        return Ok(base);
    }

    for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate)
            .await
            .map_err(SlugAsyncError::Predicate)?
        {
            return Ok(candidate);
        }
    }

    Err(SlugAsyncError::Slug(SlugError::Exhausted { base }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("never")]
    struct Never;

    #[test]
    fn derive_slug_transliterates_accents() {
        assert_eq!(
            derive_slug("Emissão de Notas Fiscais").expect("slug"),
            "emissao-de-notas-fiscais"
        );
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[tokio::test]
    async fn unique_slug_appends_counter() {
        let taken = ["primeiros-passos", "primeiros-passos-2"];
        let slug = generate_unique_slug_async("Primeiros passos", |candidate| {
            let free = !taken.contains(&candidate);
            async move { Ok::<_, Never>(free) }
        })
        .await
        .expect("unique slug");

        assert_eq!(slug, "primeiros-passos-3");
    }
}
