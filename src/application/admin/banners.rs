//! Banner administration.
//!
//! Banners are addressed by storage id. Deleting one only flags it inactive,
//! so the admin listing keeps showing it.

use std::sync::Arc;

use crate::application::repos::BannersRepo;
use crate::domain::entities::{Banner, BannerFields, BannerPageCount};
use vitrine_api_types::DEFAULT_BANNER_PAGE;

use super::{AdminError, record_mutation};

const ENTITY: &str = "banner";

/// Page key served by `GET /banners/all`; no banner may be scoped to it.
pub const RESERVED_PAGE: &str = "all";

#[derive(Clone)]
pub struct AdminBannerService {
    repo: Arc<dyn BannersRepo>,
}

impl AdminBannerService {
    pub fn new(repo: Arc<dyn BannersRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, page: Option<&str>) -> Result<Vec<Banner>, AdminError> {
        let page = page.map(str::trim).filter(|page| !page.is_empty());
        Ok(self.repo.list_all_banners(page).await?)
    }

    pub async fn page_counts(&self) -> Result<Vec<BannerPageCount>, AdminError> {
        Ok(self.repo.banner_page_counts().await?)
    }

    pub async fn find(&self, id: i64) -> Result<Banner, AdminError> {
        self.repo
            .find_banner(id)
            .await?
            .ok_or_else(|| AdminError::not_found(ENTITY, id))
    }

    pub async fn create(&self, actor: &str, fields: BannerFields) -> Result<Banner, AdminError> {
        let fields = normalize(fields)?;
        let created = self.repo.create_banner(&fields).await?;
        record_mutation(actor, "banners", "create", &created.id.to_string());
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &str,
        id: i64,
        fields: BannerFields,
    ) -> Result<Banner, AdminError> {
        let fields = normalize(fields)?;
        let updated = self
            .repo
            .update_banner(id, &fields)
            .await?
            .ok_or_else(|| AdminError::not_found(ENTITY, id))?;
        record_mutation(actor, "banners", "update", &id.to_string());
        Ok(updated)
    }

    pub async fn delete(&self, actor: &str, id: i64) -> Result<(), AdminError> {
        if !self.repo.deactivate_banner(id).await? {
            return Err(AdminError::not_found(ENTITY, id));
        }
        record_mutation(actor, "banners", "deactivate", &id.to_string());
        Ok(())
    }
}

/// Require a title or an image and pin the page scope, defaulting to home.
pub(crate) fn normalize(mut fields: BannerFields) -> Result<BannerFields, AdminError> {
    fields.title = fields.title.trim().to_string();
    fields.image = fields.image.trim().to_string();
    if fields.title.is_empty() && fields.image.is_empty() {
        return Err(AdminError::missing("title"));
    }

    let page = fields
        .page
        .as_deref()
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .unwrap_or(DEFAULT_BANNER_PAGE)
        .to_string();
    if page == RESERVED_PAGE {
        return Err(AdminError::Invalid(format!(
            "`{RESERVED_PAGE}` cannot be used as a banner page"
        )));
    }
    fields.page = Some(page);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_page_becomes_home() {
        let fields = normalize(BannerFields {
            title: "Promo".into(),
            page: Some("  ".into()),
            ..BannerFields::default()
        })
        .expect("valid banner");
        assert_eq!(fields.page.as_deref(), Some("home"));
    }

    #[test]
    fn image_only_banner_is_accepted() {
        let fields = normalize(BannerFields {
            image: "/uploads/hero.png".into(),
            page: Some("sobre".into()),
            ..BannerFields::default()
        })
        .expect("valid banner");
        assert_eq!(fields.page.as_deref(), Some("sobre"));
    }

    #[test]
    fn banner_without_title_or_image_is_rejected() {
        let err = normalize(BannerFields::default()).expect_err("empty banner");
        assert!(matches!(err, AdminError::MissingField { field: "title" }));
    }

    #[test]
    fn reserved_page_is_rejected() {
        let err = normalize(BannerFields {
            title: "x".into(),
            page: Some("all".into()),
            ..BannerFields::default()
        })
        .expect_err("reserved page");
        assert!(matches!(err, AdminError::Invalid(_)));
    }
}
