use super::{ArticleId, CommentId, UserId, UserProfile};
use serde::{Deserialize, Serialize};

/// One node of an article's comment tree, with its author snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    #[serde(default)]
    pub article_id: Option<ArticleId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "super::lenient_datetime")]
    pub created_at: Option<chrono::NaiveDateTime>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub replies: Vec<Comment>,
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Comment {}

impl std::hash::Hash for Comment {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Comment {
    /// Local stand-in for a comment the server has not confirmed yet.
    pub fn provisional(
        id: CommentId,
        article_id: ArticleId,
        parent_id: Option<CommentId>,
        author: &UserProfile,
        content: String,
        now: chrono::NaiveDateTime,
    ) -> Self {
        Self {
            id,
            parent_id,
            article_id: Some(article_id),
            user_id: Some(author.id.clone()),
            username: Some(author.username.clone()),
            avatar_url: author.avatar_url.clone(),
            content,
            created_at: Some(now),
            replies: Vec::new(),
        }
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|x| !x.trim().is_empty())
            .unwrap_or("Anonymous")
    }

    pub fn avatar_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.avatar_url
            .as_deref()
            .filter(|x| !x.trim().is_empty())
            .unwrap_or(placeholder)
    }

    /// Ownership is decided by identifier, never by display name.
    #[inline]
    pub fn is_authored_by(&self, viewer: &UserId) -> bool {
        self.user_id.as_ref() == Some(viewer)
    }
}

/// Body of `POST /api/comments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub article_id: ArticleId,
    pub content: String,
    /// `null` for a root comment, the exact id text of the parent otherwise.
    pub parent_id: Option<CommentId>,
}

/// The comment endpoint returns either the bare list of roots or a page
/// whose `records` are the roots.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommentPayload {
    Roots(Vec<Comment>),
    Page {
        #[serde(default, deserialize_with = "super::null_as_default")]
        records: Vec<Comment>,
    },
}

impl CommentPayload {
    pub fn into_roots(self) -> Vec<Comment> {
        match self {
            CommentPayload::Roots(x) | CommentPayload::Page { records: x } => x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_comment_with_missing_fields() {
        let raw = r#"{
            "id": "1790000000000000001",
            "articleId": "7",
            "userId": "3",
            "username": null,
            "content": "first!",
            "parentId": null,
            "createdAt": "2024-05-01T08:00:00",
            "replies": null
        }"#;
        let comment: Comment = serde_json::from_str(raw).unwrap();
        assert_eq!(comment.id.as_str(), "1790000000000000001");
        assert!(comment.parent_id.is_none());
        assert!(comment.replies.is_empty());
        assert_eq!(comment.display_name(), "Anonymous");
        assert_eq!(comment.avatar_or("placeholder.png"), "placeholder.png");
        assert!(comment.is_authored_by(&UserId::new("3")));
        assert!(!comment.is_authored_by(&UserId::new("33")));
    }

    #[test]
    fn payload_accepts_list_and_page() {
        let list: CommentPayload = serde_json::from_str(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(list.into_roots().len(), 2);

        let page: CommentPayload =
            serde_json::from_str(r#"{"records": [{"id": 1}], "total": 1, "current": 1}"#).unwrap();
        assert_eq!(page.into_roots().len(), 1);
    }

    #[test]
    fn new_reply_sends_exact_parent_text() {
        let body = NewComment {
            article_id: ArticleId::new("7"),
            content: "agreed".into(),
            parent_id: Some(CommentId::new("12345678901234567")),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["parentId"], "12345678901234567");
        assert_eq!(json["articleId"], "7");

        let root = NewComment {
            parent_id: None,
            ..body
        };
        assert!(serde_json::to_value(&root).unwrap()["parentId"].is_null());
    }
}
