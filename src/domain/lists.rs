//! Ordered string lists persisted as serialized text columns.
//!
//! Lists are written as JSON arrays. Decoding is exact for anything this
//! module wrote, including `[]` and `[""]`.

use tracing::warn;

pub fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a stored list. Text that is not a JSON string array decodes to an
/// empty list and is logged, so one corrupt legacy row cannot fail a listing.
pub fn decode_list(column: &'static str, raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                target = "vitrine::db::lists",
                column,
                error = %err,
                "stored list is not a JSON string array; treating as empty"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(items: Vec<String>) {
        let encoded = encode_list(&items);
        assert_eq!(decode_list("features", &encoded), items);
    }

    #[test]
    fn lists_round_trip_exactly() {
        round_trip(Vec::new());
        round_trip(vec![String::new()]);
        round_trip(vec!["Gestão fiscal".into(), "a, b".into(), "\"quoted\"".into()]);
    }

    #[test]
    fn corrupt_text_decodes_to_empty() {
        assert!(decode_list("features", "not json").is_empty());
        assert!(decode_list("features", "").is_empty());
        assert!(decode_list("features", "{\"a\":1}").is_empty());
    }
}
