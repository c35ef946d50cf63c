use std::sync::Arc;

use crate::application::admin::banners::AdminBannerService;
use crate::application::admin::content::AdminContentService;
use crate::application::admin::dashboard::AdminDashboardService;
use crate::application::admin::help::AdminHelpService;
use crate::application::admin::segments::AdminSegmentService;
use crate::application::admin::solution_pages::AdminSolutionPageService;
use crate::application::admin::solutions::AdminSolutionService;
use crate::application::admin::stats::AdminStatService;
use crate::application::auth::AuthService;
use crate::infra::uploads::UploadStorage;

#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService>,
    pub content: Arc<AdminContentService>,
    pub solutions: Arc<AdminSolutionService>,
    pub segments: Arc<AdminSegmentService>,
    pub stats: Arc<AdminStatService>,
    pub banners: Arc<AdminBannerService>,
    pub solution_pages: Arc<AdminSolutionPageService>,
    pub help: Arc<AdminHelpService>,
    pub dashboard: Arc<AdminDashboardService>,
    pub upload_storage: Arc<UploadStorage>,
}
