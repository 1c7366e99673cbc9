//! Client side of the DevSpace REST backend.

mod envelope;
mod http;
#[cfg(test)]
pub mod mock;

pub use envelope::{Envelope, Status};
pub use http::HttpApi;

use crate::error::ApiError;
use crate::models::{
    ActivityType, Article, ArticleId, ArticleStats, ArticleSummary, AvatarUpload, Comment,
    CommentId, ListQuery, NewComment, Page, ProfileUpdate, UserActivity, UserId, UserProfile,
};
use async_trait::async_trait;

/// Every backend call the pages make. Futures are not `Send` because the
/// browser runs them on its single event loop.
#[async_trait(?Send)]
pub trait Api {
    async fn article(&self, id: &ArticleId) -> Result<Article, ApiError>;

    async fn delete_article(&self, id: &ArticleId) -> Result<(), ApiError>;

    /// Likes the article when `on`, withdraws the like otherwise.
    async fn set_like(&self, id: &ArticleId, on: bool) -> Result<(), ApiError>;

    async fn set_collect(&self, id: &ArticleId, on: bool) -> Result<(), ApiError>;

    /// The full nested comment tree of an article, roots first.
    async fn comments(&self, article: &ArticleId) -> Result<Vec<Comment>, ApiError>;

    async fn create_comment(&self, body: &NewComment) -> Result<(), ApiError>;

    async fn delete_comment(&self, id: &CommentId) -> Result<(), ApiError>;

    async fn articles(&self, query: &ListQuery) -> Result<Page<ArticleSummary>, ApiError>;

    async fn article_stats(&self, id: &ArticleId, days: u32) -> Result<ArticleStats, ApiError>;

    /// The logged in user. Fails with `NotAuthenticated` for visitors.
    async fn profile(&self) -> Result<UserProfile, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError>;

    /// Returns the URL of the stored image.
    async fn upload_avatar(&self, avatar: AvatarUpload) -> Result<String, ApiError>;

    async fn collections(&self, page: u32, size: u32) -> Result<Page<ArticleSummary>, ApiError>;

    async fn activities(
        &self,
        user: &UserId,
        kind: Option<&ActivityType>,
        page: u32,
        size: u32,
    ) -> Result<Page<UserActivity>, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;
}

/// The client shared through the Leptos context, provided on first use.
pub fn use_api() -> std::rc::Rc<HttpApi> {
    if let Some(api) = leptos::use_context::<std::rc::Rc<HttpApi>>() {
        return api;
    }
    let api = std::rc::Rc::new(HttpApi::from_config());
    leptos::provide_context(api.clone());
    api
}
