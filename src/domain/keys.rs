//! Validation for the flat key/value stores (site content and settings).

use vitrine_api_types::content::section_of;

use super::error::DomainError;

pub const MAX_KEY_LEN: usize = 200;

/// A validated content row ready for upsert, with its section denormalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpsert {
    pub key: String,
    pub section: String,
    pub value: String,
}

fn key_is_valid(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key.trim() == key
        && !key.chars().any(char::is_control)
}

/// Validate every key of a batch, reporting all offenders at once.
pub fn validate_batch<'a, I>(keys: I) -> Result<(), DomainError>
where
    I: IntoIterator<Item = &'a str>,
{
    let invalid: Vec<String> = keys
        .into_iter()
        .filter(|key| !key_is_valid(key))
        .map(|key| format!("{key:?}"))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(DomainError::InvalidKeys { keys: invalid })
    }
}

/// Validate a content batch and derive each row's section from its key.
pub fn content_batch<I>(pairs: I) -> Result<Vec<ContentUpsert>, DomainError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let pairs: Vec<(String, String)> = pairs.into_iter().collect();
    validate_batch(pairs.iter().map(|(key, _)| key.as_str()))?;

    Ok(pairs
        .into_iter()
        .map(|(key, value)| ContentUpsert {
            section: section_of(&key).to_string(),
            key,
            value,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_batch_derives_sections() {
        let rows = content_batch([
            ("hero.title".to_string(), "Acme".to_string()),
            ("footer".to_string(), String::new()),
        ])
        .expect("valid batch");

        assert_eq!(rows[0].section, "hero");
        assert_eq!(rows[1].section, "footer");
        assert_eq!(rows[1].value, "");
    }

    #[test]
    fn batch_reports_every_invalid_key() {
        let err = content_batch([
            ("ok.key".to_string(), "1".to_string()),
            (String::new(), "2".to_string()),
            (" padded".to_string(), "3".to_string()),
        ])
        .expect_err("invalid batch");

        match err {
            DomainError::InvalidKeys { keys } => {
                assert_eq!(keys, vec!["\"\"".to_string(), "\" padded\"".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn overlong_key_is_rejected() {
        let key = "k".repeat(MAX_KEY_LEN + 1);
        assert!(validate_batch([key.as_str()]).is_err());
    }
}
