//! Domain entities mirrored from persistent storage.
//!
//! Records share their shape with the wire types, so they are re-exported
//! from `vitrine-api-types` rather than duplicated here.

pub use vitrine_api_types::{
    AdminIdentity, Banner, BannerFields, BannerPageCount, ContentEntry, HelpArticle,
    HelpArticleInput, HelpCategory, HelpCategoryInput, HelpCategoryRef, HelpCategorySummary,
    HelpImage, HelpImageInput, HelpStatus, NewSegment, NewSolution, NewSolutionPage, NewStat,
    Segment, SegmentFields, SettingEntry, Solution, SolutionFields, SolutionPage,
    SolutionPageFields, Stat, StatFields,
};

/// Stored admin account. The password hash never leaves the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUserRecord {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl AdminUserRecord {
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}
