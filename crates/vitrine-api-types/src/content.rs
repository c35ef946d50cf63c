//! Flat key/value content and the quick-links slot scheme.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Content folded into a single `key -> value` map, as served by `GET /content`.
pub type ContentMap = BTreeMap<String, String>;

/// Global style settings, as served by `GET /settings`.
pub type SettingsMap = BTreeMap<String, String>;

pub const DEFAULT_CONTENT_TYPE: &str = "text";

/// Number of indexed quick-link slots persisted on every save.
pub const MAX_QUICK_LINKS: usize = 8;

pub const QUICK_LINKS_SECTION: &str = "quick_links";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub key: String,
    pub section: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    pub label: String,
    pub url: String,
}

impl QuickLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Section of a dot-namespaced key: everything before the first `.`.
///
/// Keys without a dot are their own section.
pub fn section_of(key: &str) -> &str {
    key.split_once('.').map_or(key, |(section, _)| section)
}

/// Fold `(key, value)` pairs into a map. A repeated key keeps the last value.
pub fn fold_entries<I, K, V>(entries: I) -> ContentMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

pub fn quick_link_label_key(index: usize) -> String {
    format!("{QUICK_LINKS_SECTION}.{index}.label")
}

pub fn quick_link_url_key(index: usize) -> String {
    format!("{QUICK_LINKS_SECTION}.{index}.url")
}

/// Links shown when no quick-link slot carries a label.
pub fn default_quick_links() -> Vec<QuickLink> {
    vec![
        QuickLink::new("Soluções", "/solucoes"),
        QuickLink::new("Segmentos", "/segmentos"),
        QuickLink::new("Sobre", "/sobre"),
        QuickLink::new("Contato", "/contato"),
    ]
}

/// Encode links into the full set of slot keys.
///
/// Input beyond [`MAX_QUICK_LINKS`] is dropped and unused slots are written as
/// empty strings, so a save always covers every slot.
pub fn encode_quick_links(links: &[QuickLink]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(MAX_QUICK_LINKS * 2);
    for index in 0..MAX_QUICK_LINKS {
        let (label, url) = links
            .get(index)
            .map(|link| (link.label.trim().to_string(), link.url.trim().to_string()))
            .unwrap_or_default();
        pairs.push((quick_link_label_key(index), label));
        pairs.push((quick_link_url_key(index), url));
    }
    pairs
}

/// Decode quick links from folded content, falling back to the defaults when
/// every slot is empty.
pub fn decode_quick_links(content: &ContentMap) -> Vec<QuickLink> {
    let links: Vec<QuickLink> = (0..MAX_QUICK_LINKS)
        .filter_map(|index| {
            let label = content.get(&quick_link_label_key(index))?;
            if label.trim().is_empty() {
                return None;
            }
            let url = content
                .get(&quick_link_url_key(index))
                .cloned()
                .unwrap_or_default();
            Some(QuickLink::new(label.clone(), url))
        })
        .collect();

    if links.is_empty() {
        default_quick_links()
    } else {
        links
    }
}
