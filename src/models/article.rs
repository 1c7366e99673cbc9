use super::{ArticleId, UserId};
use serde::Deserialize;

pub const STATUS_DRAFT: i32 = 0;
pub const STATUS_PUBLISHED: i32 = 1;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Rendered HTML body.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub content: String,
    #[serde(default)]
    pub author_id: Option<UserId>,
    #[serde(default)]
    pub author_username: Option<String>,
    #[serde(default)]
    pub author_avatar_url: Option<String>,
    #[serde(default)]
    pub author_bio: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default, deserialize_with = "super::lenient_datetime")]
    pub created_at: Option<chrono::NaiveDateTime>,
    #[serde(default, deserialize_with = "super::lenient_datetime")]
    pub updated_at: Option<chrono::NaiveDateTime>,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub collect_count: u64,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub comment_count: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub liked_by_current_user: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub collected_by_current_user: bool,
}

impl Article {
    #[inline]
    pub fn author_name(&self) -> &str {
        self.author_username
            .as_deref()
            .filter(|x| !x.trim().is_empty())
            .unwrap_or("Anonymous")
    }

    #[inline]
    pub fn is_authored_by(&self, viewer: &UserId) -> bool {
        self.author_id.as_ref() == Some(viewer)
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.status == Some(STATUS_PUBLISHED)
    }
}

/// Row of an article listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: ArticleId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_id: Option<UserId>,
    #[serde(default)]
    pub author_username: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default, deserialize_with = "super::lenient_datetime")]
    pub created_at: Option<chrono::NaiveDateTime>,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub collect_count: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: Vec<String>,
}

impl ArticleSummary {
    const EXCERPT_CHARS: usize = 150;

    /// The summary when present, otherwise the head of the body text.
    pub fn excerpt(&self) -> String {
        if let Some(summary) = self.summary.as_deref().filter(|x| !x.trim().is_empty()) {
            return summary.to_string();
        }
        let body = strip_tags(self.content.as_deref().unwrap_or_default());
        let mut chars = body.chars();
        let head: String = chars.by_ref().take(Self::EXCERPT_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    #[inline]
    pub fn author_name(&self) -> &str {
        self.author_username
            .as_deref()
            .filter(|x| !x.trim().is_empty())
            .unwrap_or("Anonymous")
    }
}

pub(crate) fn strip_tags(html: &str) -> String {
    static TAGS: once_cell::sync::Lazy<regex::Regex> =
        once_cell::sync::Lazy::new(|| regex::Regex::new(r"<[^>]*>").unwrap());
    TAGS.replace_all(html, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_counts_arrive_as_strings() {
        let raw = r#"{
            "id": "42",
            "title": "Ownership",
            "content": "<p>Hi</p>",
            "authorId": "5",
            "status": 1,
            "viewCount": "120",
            "likeCount": "3",
            "collectCount": null,
            "likedByCurrentUser": true,
            "collectedByCurrentUser": null,
            "tags": ["rust"]
        }"#;
        let article: Article = serde_json::from_str(raw).unwrap();
        assert_eq!(article.view_count, 120);
        assert_eq!(article.like_count, 3);
        assert_eq!(article.collect_count, 0);
        assert_eq!(article.comment_count, 0);
        assert!(article.liked_by_current_user);
        assert!(!article.collected_by_current_user);
        assert!(article.is_published());
        assert!(article.is_authored_by(&UserId::new("5")));
        assert_eq!(article.author_name(), "Anonymous");
    }

    #[test]
    fn excerpt_prefers_summary_then_plain_body() {
        let mut row = ArticleSummary {
            summary: Some("short".into()),
            content: Some("<p>ignored</p>".into()),
            ..Default::default()
        };
        assert_eq!(row.excerpt(), "short");

        row.summary = None;
        assert_eq!(row.excerpt(), "ignored");

        row.content = Some(format!("<p>{}</p>", "a".repeat(200)));
        let excerpt = row.excerpt();
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 153);
    }
}
