//! Thin typed wrapper over the Vitrine HTTP surface.

use std::path::Path;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use vitrine_api_types::content::{ContentMap, SettingsMap};
use vitrine_api_types::{
    AdminIdentity, AllData, ApiErrorBody, Banner, BannerFields, BatchUpdated, CategoryArticles,
    HelpArticle, HelpArticleDetail, HelpCategorySummary, LoginRequest, LoginResponse, NewSegment,
    NewSolution, NewSolutionPage, NewStat, QuickLink, Segment, SegmentFields, Solution,
    SolutionFields, SolutionPage, SolutionPageFields, Stat, StatFields, UploadResponse,
};

use crate::error::ClientError;

const FALLBACK_FILENAME: &str = "upload.bin";

#[derive(Clone, Debug)]
pub struct SiteClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl SiteClient {
    /// Client for the server at `base_url`. A path prefix in the URL is kept.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidInput(format!(
                "`{base_url}` cannot be used as a base URL"
            )));
        }
        let http = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            http,
            base,
            token: None,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("vitrine-client/", env!("CARGO_PKG_VERSION"))
    }

    /// Same client, sending `token` as bearer credentials.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ClientError::InvalidInput("base URL cannot carry a path".to_string())
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorize(request).send().await?;
        let bytes = check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        self.execute(self.http.get(url)).await
    }

    async fn send<B, T>(&self, method: Method, segments: &[&str], body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        self.execute(self.http.request(method, url).json(body)).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), ClientError> {
        let url = self.endpoint(segments)?;
        let response = self.authorize(self.http.delete(url)).send().await?;
        check(response).await?;
        Ok(())
    }

    // ============ Auth ============

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(Method::POST, &["auth", "login"], &body).await
    }

    pub async fn me(&self) -> Result<AdminIdentity, ClientError> {
        self.get(&["auth", "me"]).await
    }

    // ============ Public façade ============

    pub async fn content(&self) -> Result<ContentMap, ClientError> {
        self.get(&["content"]).await
    }

    pub async fn quick_links(&self) -> Result<Vec<QuickLink>, ClientError> {
        self.get(&["content", "quick-links"]).await
    }

    pub async fn settings(&self) -> Result<SettingsMap, ClientError> {
        self.get(&["settings"]).await
    }

    pub async fn solutions(&self) -> Result<Vec<Solution>, ClientError> {
        self.get(&["solutions"]).await
    }

    pub async fn segments(&self) -> Result<Vec<Segment>, ClientError> {
        self.get(&["segments"]).await
    }

    pub async fn stats(&self) -> Result<Vec<Stat>, ClientError> {
        self.get(&["stats"]).await
    }

    pub async fn banners(&self, page: &str) -> Result<Vec<Banner>, ClientError> {
        self.get(&["banners", page]).await
    }

    /// Active banners of every page.
    pub async fn all_banners(&self) -> Result<Vec<Banner>, ClientError> {
        self.get(&["banners", "all"]).await
    }

    pub async fn solution_pages(&self) -> Result<Vec<SolutionPage>, ClientError> {
        self.get(&["solution-pages"]).await
    }

    pub async fn solution_page(&self, slug: &str) -> Result<SolutionPage, ClientError> {
        self.get(&["solution-pages", slug]).await
    }

    pub async fn help_categories(&self) -> Result<Vec<HelpCategorySummary>, ClientError> {
        self.get(&["help", "categories"]).await
    }

    pub async fn category_articles(&self, slug: &str) -> Result<CategoryArticles, ClientError> {
        self.get(&["help", "categories", slug, "articles"]).await
    }

    /// Fetching an article counts a view on the server.
    pub async fn help_article(&self, slug: &str) -> Result<HelpArticleDetail, ClientError> {
        self.get(&["help", "articles", slug]).await
    }

    pub async fn search_help(&self, query: &str) -> Result<Vec<HelpArticle>, ClientError> {
        let mut url = self.endpoint(&["help", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        self.execute(self.http.get(url)).await
    }

    // ============ Admin ============

    pub async fn all_data(&self) -> Result<AllData, ClientError> {
        self.get(&["admin", "all-data"]).await
    }

    pub async fn update_content(&self, batch: &ContentMap) -> Result<BatchUpdated, ClientError> {
        self.send(Method::PUT, &["admin", "content"], batch).await
    }

    pub async fn save_quick_links(
        &self,
        links: &[QuickLink],
    ) -> Result<Vec<QuickLink>, ClientError> {
        self.send(Method::PUT, &["admin", "content", "quick-links"], links)
            .await
    }

    pub async fn update_settings(&self, batch: &SettingsMap) -> Result<BatchUpdated, ClientError> {
        self.send(Method::PUT, &["admin", "settings"], batch).await
    }

    pub async fn create_solution(&self, input: &NewSolution) -> Result<Solution, ClientError> {
        self.send(Method::POST, &["admin", "solutions"], input).await
    }

    pub async fn update_solution(
        &self,
        solution_id: &str,
        fields: &SolutionFields,
    ) -> Result<Solution, ClientError> {
        self.send(Method::PUT, &["admin", "solutions", solution_id], fields)
            .await
    }

    pub async fn delete_solution(&self, solution_id: &str) -> Result<(), ClientError> {
        self.delete(&["admin", "solutions", solution_id]).await
    }

    pub async fn create_segment(&self, input: &NewSegment) -> Result<Segment, ClientError> {
        self.send(Method::POST, &["admin", "segments"], input).await
    }

    pub async fn update_segment(
        &self,
        segment_id: &str,
        fields: &SegmentFields,
    ) -> Result<Segment, ClientError> {
        self.send(Method::PUT, &["admin", "segments", segment_id], fields)
            .await
    }

    pub async fn delete_segment(&self, segment_id: &str) -> Result<(), ClientError> {
        self.delete(&["admin", "segments", segment_id]).await
    }

    pub async fn create_stat(&self, input: &NewStat) -> Result<Stat, ClientError> {
        self.send(Method::POST, &["admin", "stats"], input).await
    }

    pub async fn update_stat(&self, stat_id: &str, fields: &StatFields) -> Result<Stat, ClientError> {
        self.send(Method::PUT, &["admin", "stats", stat_id], fields)
            .await
    }

    pub async fn delete_stat(&self, stat_id: &str) -> Result<(), ClientError> {
        self.delete(&["admin", "stats", stat_id]).await
    }

    pub async fn create_banner(&self, fields: &BannerFields) -> Result<Banner, ClientError> {
        self.send(Method::POST, &["admin", "banners"], fields).await
    }

    pub async fn update_banner(&self, id: i64, fields: &BannerFields) -> Result<Banner, ClientError> {
        let id = id.to_string();
        self.send(Method::PUT, &["admin", "banners", &id], fields)
            .await
    }

    /// Soft delete: the server keeps the row, flagged inactive.
    pub async fn delete_banner(&self, id: i64) -> Result<(), ClientError> {
        let id = id.to_string();
        self.delete(&["admin", "banners", &id]).await
    }

    pub async fn create_solution_page(
        &self,
        input: &NewSolutionPage,
    ) -> Result<SolutionPage, ClientError> {
        self.send(Method::POST, &["admin", "solution-pages"], input)
            .await
    }

    pub async fn update_solution_page(
        &self,
        slug: &str,
        fields: &SolutionPageFields,
    ) -> Result<SolutionPage, ClientError> {
        self.send(Method::PUT, &["admin", "solution-pages", slug], fields)
            .await
    }

    pub async fn delete_solution_page(&self, slug: &str) -> Result<(), ClientError> {
        self.delete(&["admin", "solution-pages", slug]).await
    }

    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        let url = self.endpoint(&["admin", "upload"])?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.execute(self.http.post(url).multipart(form)).await
    }

    pub async fn upload_file(&self, path: &Path) -> Result<UploadResponse, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::File {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(FALLBACK_FILENAME);
        self.upload(file_name, bytes).await
    }
}

/// Pass 2xx responses through; turn anything else into `ClientError::Api`,
/// decoding the server's error envelope when there is one.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await?;
    let (code, message) = match serde_json::from_slice::<ApiErrorBody>(&bytes) {
        Ok(body) => {
            let message = match body.error.hint {
                Some(hint) => format!("{} ({hint})", body.error.message),
                None => body.error.message,
            };
            (body.error.code, message)
        }
        Err(_) => (
            status
                .canonical_reason()
                .unwrap_or("unknown")
                .to_ascii_lowercase()
                .replace(' ', "_"),
            String::from_utf8_lossy(&bytes).into_owned(),
        ),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_prefix_and_escapes_segments() {
        let client = SiteClient::new("https://example.com/cms/").expect("client");
        let url = client
            .endpoint(&["admin", "solutions", "erp pro/x"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://example.com/cms/admin/solutions/erp%20pro%2Fx"
        );

        let bare = SiteClient::new("http://127.0.0.1:3001").expect("client");
        assert_eq!(
            bare.endpoint(&["banners", "all"]).expect("url").as_str(),
            "http://127.0.0.1:3001/banners/all"
        );
    }

    #[test]
    fn with_token_keeps_base() {
        let client = SiteClient::new("http://localhost:3001").expect("client");
        let authed = client.with_token("abc");
        assert_eq!(authed.token(), Some("abc"));
        assert!(client.token().is_none());
        assert_eq!(authed.base, client.base);
    }
}
