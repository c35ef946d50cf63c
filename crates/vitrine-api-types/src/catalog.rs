//! Catalog entities: solutions, segments, stats, banners and solution pages.
//!
//! Every record is split into its addressing part (storage id, business key)
//! and a `*Fields` struct carrying the editable attributes. Create requests
//! flatten the fields next to the business key; updates send the fields alone
//! and address the record through the path.

use serde::{Deserialize, Serialize};

/// Page scope assumed for banners that carry no page.
pub const DEFAULT_BANNER_PAGE: &str = "home";

pub const DEFAULT_STAT_SECTION: &str = "numbers";

fn default_true() -> bool {
    true
}

fn default_stat_section() -> String {
    DEFAULT_STAT_SECTION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub cta_text: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub order_num: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub id: i64,
    pub solution_id: String,
    #[serde(flatten)]
    pub fields: SolutionFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSolution {
    pub solution_id: String,
    #[serde(flatten)]
    pub fields: SolutionFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentFields {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub order_num: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: i64,
    pub segment_id: String,
    #[serde(flatten)]
    pub fields: SegmentFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSegment {
    pub segment_id: String,
    #[serde(flatten)]
    pub fields: SegmentFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatFields {
    pub value: String,
    pub label: String,
    #[serde(default = "default_stat_section")]
    pub section: String,
    #[serde(default)]
    pub order_num: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub id: i64,
    pub stat_id: String,
    #[serde(flatten)]
    pub fields: StatFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStat {
    pub stat_id: String,
    #[serde(flatten)]
    pub fields: StatFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BannerFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub cta_text: String,
    #[serde(default)]
    pub cta_link: String,
    #[serde(default)]
    pub order_num: i32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub use_default_bg: bool,
    #[serde(default)]
    pub bg_color: String,
    /// Page scope. `None` only appears on rows written before pages existed.
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: i64,
    #[serde(flatten)]
    pub fields: BannerFields,
}

impl Banner {
    /// Effective page scope, treating a missing page as the home page.
    pub fn page(&self) -> &str {
        self.fields
            .page
            .as_deref()
            .filter(|page| !page.trim().is_empty())
            .unwrap_or(DEFAULT_BANNER_PAGE)
    }

    /// Active and scoped to `page`; a blank page means the home page.
    pub fn is_visible_on(&self, page: &str) -> bool {
        let requested = match page.trim() {
            "" => DEFAULT_BANNER_PAGE,
            page => page,
        };
        self.fields.active && self.page() == requested
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerPageCount {
    pub page: String,
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionPageFields {
    #[serde(default)]
    pub solution_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hero_image: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub integrations: Vec<String>,
    #[serde(default)]
    pub cta_text: String,
    #[serde(default)]
    pub cta_link: String,
    #[serde(default)]
    pub order_num: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionPage {
    pub id: i64,
    pub slug: String,
    #[serde(flatten)]
    pub fields: SolutionPageFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSolutionPage {
    pub slug: String,
    #[serde(flatten)]
    pub fields: SolutionPageFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banner(page: Option<&str>, active: bool) -> Banner {
        Banner {
            id: 1,
            fields: BannerFields {
                title: "t".into(),
                active,
                page: page.map(str::to_string),
                ..BannerFields::default()
            },
        }
    }

    #[test]
    fn legacy_banner_without_page_belongs_to_home() {
        assert!(banner(None, true).is_visible_on("home"));
        assert!(banner(None, true).is_visible_on(""));
        assert!(!banner(None, true).is_visible_on("sobre"));
    }

    #[test]
    fn inactive_banner_is_never_visible() {
        assert!(!banner(Some("home"), false).is_visible_on("home"));
    }

    #[test]
    fn create_payload_defaults_optional_fields() {
        let solution: NewSolution =
            serde_json::from_value(serde_json::json!({"solution_id": "erp", "title": "ERP"}))
                .expect("decode");
        assert!(solution.fields.active);
        assert!(solution.fields.features.is_empty());

        let stat: NewStat = serde_json::from_value(
            serde_json::json!({"stat_id": "clients", "value": "500+", "label": "Clientes"}),
        )
        .expect("decode");
        assert_eq!(stat.fields.section, DEFAULT_STAT_SECTION);
    }
}
