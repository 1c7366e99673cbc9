use super::{Api, Envelope};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    ActivityType, Article, ArticleId, ArticleStats, ArticleSummary, AvatarUpload, Comment,
    CommentId, CommentPayload, ListQuery, NewComment, Page, ProfileUpdate, RawPage, UserActivity,
    UserId, UserProfile,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{header::ACCEPT, Method, RequestBuilder};

static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    #[cfg(not(target_arch = "wasm32"))]
    {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("falling back to a client without cookies: {err}");
                reqwest::Client::new()
            })
    }
    #[cfg(target_arch = "wasm32")]
    {
        reqwest::Client::new()
    }
});

fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// [`Api`] over HTTP. In the browser the session cookie rides along with
/// every request.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
    not_logged_in_code: i32,
}

impl HttpApi {
    pub fn new(base: &str, not_logged_in_code: i32) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            not_logged_in_code,
        }
    }

    pub fn from_config() -> Self {
        let config = Config::global();
        Self::new(&config.api_base(), config.not_logged_in_code)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = url::Url::parse(&format!("{}{}", self.base, path))?;
        tracing::debug!("{method} {url}");
        #[allow(unused_mut)]
        let mut req = CLIENT.request(method, url).header(ACCEPT, "application/json");
        #[cfg(target_arch = "wasm32")]
        {
            req = req.fetch_credentials_include();
        }
        Ok(req)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Envelope, ApiError> {
        let response = req.send().await.map_err(|err| {
            tracing::error!("request failed: {err}");
            ApiError::from(err)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Envelope::parse(status, &body, self.not_logged_in_code).map_err(|err| {
            tracing::warn!("backend answered HTTP {status}: {err}");
            err
        })
    }

    async fn call(&self, method: Method, path: &str) -> Result<Envelope, ApiError> {
        self.send(self.request(method, path)?).await
    }
}

#[async_trait(?Send)]
impl Api for HttpApi {
    async fn article(&self, id: &ArticleId) -> Result<Article, ApiError> {
        self.call(Method::GET, &format!("/api/articles/{}", segment(id.as_str())))
            .await?
            .result()
    }

    async fn delete_article(&self, id: &ArticleId) -> Result<(), ApiError> {
        self.call(Method::DELETE, &format!("/api/articles/{}", segment(id.as_str())))
            .await
            .map(drop)
    }

    async fn set_like(&self, id: &ArticleId, on: bool) -> Result<(), ApiError> {
        let method = if on { Method::POST } else { Method::DELETE };
        self.call(method, &format!("/api/articles/{}/like", segment(id.as_str())))
            .await
            .map(drop)
    }

    async fn set_collect(&self, id: &ArticleId, on: bool) -> Result<(), ApiError> {
        let method = if on { Method::POST } else { Method::DELETE };
        self.call(method, &format!("/api/articles/{}/collect", segment(id.as_str())))
            .await
            .map(drop)
    }

    async fn comments(&self, article: &ArticleId) -> Result<Vec<Comment>, ApiError> {
        let payload: Option<CommentPayload> = self
            .call(
                Method::GET,
                &format!("/api/comments/article/{}", segment(article.as_str())),
            )
            .await?
            .result_or_default()?;
        Ok(payload.map(CommentPayload::into_roots).unwrap_or_default())
    }

    async fn create_comment(&self, body: &NewComment) -> Result<(), ApiError> {
        let req = self.request(Method::POST, "/api/comments")?.json(body);
        self.send(req).await.map(drop)
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), ApiError> {
        self.call(Method::DELETE, &format!("/api/comments/{}", segment(id.as_str())))
            .await
            .map(drop)
    }

    async fn articles(&self, query: &ListQuery) -> Result<Page<ArticleSummary>, ApiError> {
        let raw: Option<RawPage<ArticleSummary>> = self
            .call(Method::GET, &query.api_path())
            .await?
            .result_or_default()?;
        Ok(raw.map(Page::from).unwrap_or_default())
    }

    async fn article_stats(&self, id: &ArticleId, days: u32) -> Result<ArticleStats, ApiError> {
        self.call(
            Method::GET,
            &format!("/api/stats/article/{}?days={days}", segment(id.as_str())),
        )
        .await?
        .result()
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.call(Method::GET, "/api/user/profile").await?.result()
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let req = self.request(Method::POST, "/api/user/profile")?.json(update);
        self.send(req).await?.result()
    }

    async fn upload_avatar(&self, avatar: AvatarUpload) -> Result<String, ApiError> {
        let file_name = avatar.file_name().to_string();
        let mime = avatar.mime().to_string();
        let part = reqwest::multipart::Part::bytes(avatar.into_bytes())
            .file_name(file_name)
            .mime_str(&mime)?;
        let form = reqwest::multipart::Form::new().part("avatar", part);
        let req = self.request(Method::POST, "/api/user/avatar")?.multipart(form);
        self.send(req).await?.result()
    }

    async fn collections(&self, page: u32, size: u32) -> Result<Page<ArticleSummary>, ApiError> {
        let raw: Option<RawPage<ArticleSummary>> = self
            .call(
                Method::GET,
                &format!("/api/user/collections?pageNum={page}&pageSize={size}"),
            )
            .await?
            .result_or_default()?;
        Ok(raw.map(Page::from).unwrap_or_default())
    }

    async fn activities(
        &self,
        user: &UserId,
        kind: Option<&ActivityType>,
        page: u32,
        size: u32,
    ) -> Result<Page<UserActivity>, ApiError> {
        let mut path = format!("/api/activities/user/{}", segment(user.as_str()));
        if let Some(kind) = kind {
            path.push_str(&format!("/type/{}", segment(kind.as_str())));
        }
        path.push_str(&format!("?pageNum={page}&pageSize={size}"));

        let raw: Option<RawPage<UserActivity>> =
            self.call(Method::GET, &path).await?.result_or_default()?;
        Ok(raw.map(Page::from).unwrap_or_default())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self.request(Method::POST, "/auth/logout")?.send().await?;
        tracing::info!("logout answered HTTP {}", response.status());
        Ok(())
    }
}
