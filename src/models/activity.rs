use super::{ArticleId, UserId};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityType {
    CreateArticle,
    EditArticle,
    ViewArticle,
    LikeArticle,
    CollectArticle,
    Comment,
    /// A type this client does not know yet; the raw name is kept.
    Other(String),
}

impl ActivityType {
    pub const FILTERS: [ActivityType; 6] = [
        ActivityType::CreateArticle,
        ActivityType::EditArticle,
        ActivityType::ViewArticle,
        ActivityType::LikeArticle,
        ActivityType::CollectArticle,
        ActivityType::Comment,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::CreateArticle => "CREATE_ARTICLE",
            ActivityType::EditArticle => "EDIT_ARTICLE",
            ActivityType::ViewArticle => "VIEW_ARTICLE",
            ActivityType::LikeArticle => "LIKE_ARTICLE",
            ActivityType::CollectArticle => "COLLECT_ARTICLE",
            ActivityType::Comment => "COMMENT",
            ActivityType::Other(x) => x,
        }
    }

    pub fn action_text(&self) -> &'static str {
        match self {
            ActivityType::CreateArticle => "created an article",
            ActivityType::EditArticle => "updated an article",
            ActivityType::ViewArticle => "viewed an article",
            ActivityType::LikeArticle => "liked an article",
            ActivityType::CollectArticle => "collected an article",
            ActivityType::Comment => "commented on an article",
            ActivityType::Other(_) => "performed an action",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ActivityType::CreateArticle => "ion-plus-round",
            ActivityType::EditArticle => "ion-edit",
            ActivityType::ViewArticle => "ion-eye",
            ActivityType::LikeArticle => "ion-heart",
            ActivityType::CollectArticle => "ion-bookmark",
            ActivityType::Comment => "ion-chatbubble",
            ActivityType::Other(_) => "ion-record",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::CreateArticle => "Created",
            ActivityType::EditArticle => "Edited",
            ActivityType::ViewArticle => "Viewed",
            ActivityType::LikeArticle => "Liked",
            ActivityType::CollectArticle => "Collected",
            ActivityType::Comment => "Comments",
            ActivityType::Other(_) => "Other",
        }
    }
}

impl std::str::FromStr for ActivityType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CREATE_ARTICLE" => ActivityType::CreateArticle,
            "EDIT_ARTICLE" => ActivityType::EditArticle,
            "VIEW_ARTICLE" => ActivityType::ViewArticle,
            "LIKE_ARTICLE" => ActivityType::LikeArticle,
            "COLLECT_ARTICLE" => ActivityType::CollectArticle,
            "COMMENT" => ActivityType::Comment,
            other => ActivityType::Other(other.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw.parse().unwrap_or(ActivityType::Other(raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    #[serde(deserialize_with = "super::exact_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub activity_type: ActivityType,
    #[serde(default)]
    pub activity_description: Option<String>,
    #[serde(default)]
    pub target_id: Option<ArticleId>,
    #[serde(default)]
    pub target_title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_datetime")]
    pub created_at: Option<chrono::NaiveDateTime>,
    #[serde(default)]
    pub time_ago: Option<String>,
}

impl UserActivity {
    /// Where the activity's target lives, if it has one.
    pub fn target_href(&self) -> Option<String> {
        let target = self.target_id.as_ref()?;
        match self.activity_type {
            ActivityType::Other(_) => None,
            ActivityType::Comment => Some(format!("/articles/{target}#comments")),
            _ => Some(format!("/articles/{target}")),
        }
    }

    /// Comment text of a comment activity. The backend sometimes stores
    /// the whole request body as JSON, so the `content` field is unwrapped.
    pub fn comment_text(&self) -> Option<String> {
        if self.activity_type != ActivityType::Comment {
            return None;
        }
        let raw = self.content.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with('{') {
            if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(raw) {
                if let Some(text) = map.get("content").and_then(serde_json::Value::as_str) {
                    return Some(text.to_string());
                }
            }
        }
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_types_are_kept() {
        let raw = r#"{"id": "1", "activityType": "FOLLOW_USER", "targetId": "4"}"#;
        let activity: UserActivity = serde_json::from_str(raw).unwrap();
        assert_eq!(activity.activity_type, ActivityType::Other("FOLLOW_USER".into()));
        assert_eq!(activity.activity_type.action_text(), "performed an action");
        assert_eq!(activity.target_href(), None);
    }

    #[test]
    fn comment_activity_unwraps_json_content() {
        let raw = r#"{"id": 2, "activityType": "COMMENT", "targetId": 4,
                      "content": "{\"articleId\":4,\"content\":\"nice post\"}"}"#;
        let activity: UserActivity = serde_json::from_str(raw).unwrap();
        assert_eq!(activity.comment_text().as_deref(), Some("nice post"));
        assert_eq!(activity.target_href().as_deref(), Some("/articles/4#comments"));
    }

    #[test]
    fn filters_round_trip_through_their_names() {
        for kind in ActivityType::FILTERS {
            assert_eq!(kind.as_str().parse::<ActivityType>(), Ok(kind.clone()));
        }
    }
}
