//! Help-center hierarchy: categories, articles and ordered article images.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Visibility of a help category or article on the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "help_status", rename_all = "snake_case")
)]
pub enum HelpStatus {
    #[default]
    Published,
    Draft,
}

impl HelpStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpCategory {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub order_num: i32,
    pub status: HelpStatus,
}

/// Category listing entry with the number of published articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpCategorySummary {
    #[serde(flatten)]
    pub category: HelpCategory,
    pub article_count: i64,
}

/// Create/update payload. A missing slug is derived from the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpCategoryInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub order_num: i32,
    #[serde(default)]
    pub status: HelpStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpCategoryRef {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpArticle {
    pub id: i64,
    pub category_id: i64,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub tags: Vec<String>,
    pub order_num: i32,
    pub status: HelpStatus,
    pub views: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Create/update payload. A missing slug is derived from the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpArticleInput {
    pub category_id: i64,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub order_num: i32,
    #[serde(default)]
    pub status: HelpStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpImage {
    pub id: i64,
    pub article_id: i64,
    pub url: String,
    pub caption: String,
    pub order_num: i32,
}

/// Image payload. Without `order_num` the image is appended after the last one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpImageInput {
    pub url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub order_num: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOrder {
    pub image_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpArticleDetail {
    #[serde(flatten)]
    pub article: HelpArticle,
    pub category: HelpCategoryRef,
    pub images: Vec<HelpImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryArticles {
    pub category: HelpCategory,
    pub articles: Vec<HelpArticle>,
}
