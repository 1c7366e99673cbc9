//! Scripted [`Api`] double for tests: records every call and replays
//! queued answers in order.

use super::Api;
use crate::error::ApiError;
use crate::models::{
    ActivityType, Article, ArticleId, ArticleStats, ArticleSummary, AvatarUpload, Comment,
    CommentId, ListQuery, NewComment, Page, ProfileUpdate, UserActivity, UserId, UserProfile,
};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Article(ArticleId),
    DeleteArticle(ArticleId),
    SetLike(ArticleId, bool),
    SetCollect(ArticleId, bool),
    Comments(ArticleId),
    CreateComment(NewComment),
    DeleteComment(CommentId),
    Articles(ListQuery),
    ArticleStats(ArticleId, u32),
    Profile,
    UpdateProfile(ProfileUpdate),
    UploadAvatar(String),
    Collections(u32, u32),
    Activities(UserId, Option<ActivityType>, u32, u32),
    Logout,
}

#[derive(Default)]
pub struct MockApi {
    calls: RefCell<Vec<Call>>,
    comments: RefCell<VecDeque<Result<Vec<Comment>, ApiError>>>,
    creates: RefCell<VecDeque<Result<(), ApiError>>>,
    deletes: RefCell<VecDeque<Result<(), ApiError>>>,
    toggles: RefCell<VecDeque<Result<(), ApiError>>>,
    articles: RefCell<VecDeque<Result<Page<ArticleSummary>, ApiError>>>,
    stats: RefCell<HashMap<ArticleId, Result<ArticleStats, ApiError>>>,
    profile: RefCell<Option<Result<UserProfile, ApiError>>>,
}

fn next_or<T>(queue: &RefCell<VecDeque<Result<T, ApiError>>>, default: T) -> Result<T, ApiError> {
    queue.borrow_mut().pop_front().unwrap_or(Ok(default))
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|x| matches(x)).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn push_comments(&self, answer: Result<Vec<Comment>, ApiError>) -> &Self {
        self.comments.borrow_mut().push_back(answer);
        self
    }

    pub fn push_create(&self, answer: Result<(), ApiError>) -> &Self {
        self.creates.borrow_mut().push_back(answer);
        self
    }

    pub fn push_delete(&self, answer: Result<(), ApiError>) -> &Self {
        self.deletes.borrow_mut().push_back(answer);
        self
    }

    pub fn push_toggle(&self, answer: Result<(), ApiError>) -> &Self {
        self.toggles.borrow_mut().push_back(answer);
        self
    }

    pub fn push_articles(&self, answer: Result<Page<ArticleSummary>, ApiError>) -> &Self {
        self.articles.borrow_mut().push_back(answer);
        self
    }

    pub fn set_stats(&self, id: &str, answer: Result<ArticleStats, ApiError>) -> &Self {
        self.stats.borrow_mut().insert(ArticleId::new(id), answer);
        self
    }

    pub fn set_profile(&self, answer: Result<UserProfile, ApiError>) -> &Self {
        *self.profile.borrow_mut() = Some(answer);
        self
    }
}

#[async_trait(?Send)]
impl Api for MockApi {
    async fn article(&self, id: &ArticleId) -> Result<Article, ApiError> {
        self.record(Call::Article(id.clone()));
        Ok(Article {
            id: id.clone(),
            ..Default::default()
        })
    }

    async fn delete_article(&self, id: &ArticleId) -> Result<(), ApiError> {
        self.record(Call::DeleteArticle(id.clone()));
        next_or(&self.deletes, ())
    }

    async fn set_like(&self, id: &ArticleId, on: bool) -> Result<(), ApiError> {
        self.record(Call::SetLike(id.clone(), on));
        next_or(&self.toggles, ())
    }

    async fn set_collect(&self, id: &ArticleId, on: bool) -> Result<(), ApiError> {
        self.record(Call::SetCollect(id.clone(), on));
        next_or(&self.toggles, ())
    }

    async fn comments(&self, article: &ArticleId) -> Result<Vec<Comment>, ApiError> {
        self.record(Call::Comments(article.clone()));
        next_or(&self.comments, Vec::new())
    }

    async fn create_comment(&self, body: &NewComment) -> Result<(), ApiError> {
        self.record(Call::CreateComment(body.clone()));
        next_or(&self.creates, ())
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), ApiError> {
        self.record(Call::DeleteComment(id.clone()));
        next_or(&self.deletes, ())
    }

    async fn articles(&self, query: &ListQuery) -> Result<Page<ArticleSummary>, ApiError> {
        self.record(Call::Articles(query.clone()));
        next_or(&self.articles, Page::default())
    }

    async fn article_stats(&self, id: &ArticleId, days: u32) -> Result<ArticleStats, ApiError> {
        self.record(Call::ArticleStats(id.clone(), days));
        self.stats
            .borrow()
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Transport("no stats scripted".into())))
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.record(Call::Profile);
        self.profile
            .borrow()
            .clone()
            .unwrap_or(Err(ApiError::NotAuthenticated))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.record(Call::UpdateProfile(update.clone()));
        Ok(UserProfile {
            username: update.username().to_string(),
            email: Some(update.email().to_string()),
            bio: Some(update.bio().to_string()),
            ..Default::default()
        })
    }

    async fn upload_avatar(&self, avatar: AvatarUpload) -> Result<String, ApiError> {
        self.record(Call::UploadAvatar(avatar.file_name().to_string()));
        Ok(format!("/avatars/{}", avatar.file_name()))
    }

    async fn collections(&self, page: u32, size: u32) -> Result<Page<ArticleSummary>, ApiError> {
        self.record(Call::Collections(page, size));
        Ok(Page::default())
    }

    async fn activities(
        &self,
        user: &UserId,
        kind: Option<&ActivityType>,
        page: u32,
        size: u32,
    ) -> Result<Page<UserActivity>, ApiError> {
        self.record(Call::Activities(user.clone(), kind.cloned(), page, size));
        Ok(Page::default())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record(Call::Logout);
        Ok(())
    }
}
