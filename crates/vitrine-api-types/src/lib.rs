//! Request and response types shared by the Vitrine server and its clients.
//!
//! The public façade and the admin API speak these types on the wire. The
//! content helpers (`section_of`, quick-link slot codec) live here as well so
//! that the server and the client cache agree on how flat content keys fold
//! into structured values.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod content;
pub mod help;

pub use admin::{AllData, ApiErrorBody, ApiErrorMessage, BatchUpdated, UploadResponse};
pub use auth::{AdminIdentity, LoginRequest, LoginResponse};
pub use catalog::{
    Banner, BannerFields, BannerPageCount, DEFAULT_BANNER_PAGE, NewSegment, NewSolution,
    NewSolutionPage, NewStat, Segment, SegmentFields, Solution, SolutionFields, SolutionPage,
    SolutionPageFields, Stat, StatFields,
};
pub use content::{ContentEntry, ContentMap, QuickLink, SettingEntry, SettingsMap};
pub use help::{
    CategoryArticles, HelpArticle, HelpArticleDetail, HelpArticleInput, HelpCategory,
    HelpCategoryInput, HelpCategoryRef, HelpCategorySummary, HelpImage, HelpImageInput,
    HelpStatus, ImageOrder,
};
