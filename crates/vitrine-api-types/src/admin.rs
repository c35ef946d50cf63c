//! Admin-only payloads and the error envelope shared by every endpoint.

use serde::{Deserialize, Serialize};

use crate::catalog::{Banner, Segment, Solution, SolutionPage, Stat};
use crate::content::{ContentEntry, SettingsMap};
use crate::help::{HelpArticle, HelpCategory};

/// Every entity family in one response, inactive rows included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllData {
    pub content: Vec<ContentEntry>,
    pub settings: SettingsMap,
    pub solutions: Vec<Solution>,
    pub segments: Vec<Segment>,
    pub stats: Vec<Stat>,
    pub banners: Vec<Banner>,
    pub solution_pages: Vec<SolutionPage>,
    pub help_categories: Vec<HelpCategory>,
    pub help_articles: Vec<HelpArticle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpdated {
    pub updated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub size_bytes: i64,
    pub checksum: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
