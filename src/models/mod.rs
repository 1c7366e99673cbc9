mod activity;
mod article;
mod comment;
mod pagination;
mod stats;
mod user;

pub use activity::{ActivityType, UserActivity};
pub use article::{Article, ArticleSummary, STATUS_DRAFT, STATUS_PUBLISHED};
pub(crate) use article::strip_tags;
pub use comment::{Comment, CommentPayload, NewComment};
pub use pagination::{ListQuery, Page, RawPage};
pub use stats::{ArticleStats, ChangeIndicator, DailyStats};
pub use user::{AvatarUpload, ProfileUpdate, UserProfile, AVATAR_MAX_BYTES};

/// Short localized form used for every timestamp on the pages.
pub const DATE_FORMAT: &str = "%b %-d, %Y";

/// Identifiers keep the exact decimal text the backend sent. Ids are
/// snowflake longs, so they are never routed through a float.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                crate::models::exact_id(deserializer).map(Self)
            }
        }
    };
}

string_id!(
    /// Identifier of a comment or reply, possibly a provisional placeholder.
    CommentId
);
string_id!(ArticleId);
string_id!(UserId);

const PROVISIONAL_PREFIX: &str = "temp-";

impl CommentId {
    /// Placeholder id for a node that the server has not confirmed yet.
    pub fn provisional(now_millis: i64) -> Self {
        Self(format!("{PROVISIONAL_PREFIX}{now_millis}"))
    }

    pub fn provisional_reply(now_millis: i64) -> Self {
        Self(format!("{PROVISIONAL_PREFIX}reply-{now_millis}"))
    }

    #[inline]
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

pub(crate) fn exact_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(x) => x,
        RawId::Unsigned(x) => x.to_string(),
        RawId::Signed(x) => x.to_string(),
    })
}

/// Lenient timestamp decoding: malformed or missing values become `None`
/// and render as "Unknown" instead of failing the whole payload.
pub(crate) fn lenient_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<chrono::NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::String(s) => parse_datetime(&s),
        // [year, month, day, hour, minute, second?, nanos?]
        serde_json::Value::Array(parts) => {
            let n: Vec<i64> = parts.iter().filter_map(serde_json::Value::as_i64).collect();
            let date = chrono::NaiveDate::from_ymd_opt(
                *n.first()? as i32,
                *n.get(1)? as u32,
                *n.get(2)? as u32,
            )?;
            date.and_hms_nano_opt(
                n.get(3).copied().unwrap_or(0) as u32,
                n.get(4).copied().unwrap_or(0) as u32,
                n.get(5).copied().unwrap_or(0) as u32,
                n.get(6).copied().unwrap_or(0) as u32,
            )
        }
        _ => None,
    }))
}

pub(crate) fn parse_datetime(raw: &str) -> Option<chrono::NaiveDateTime> {
    let raw = raw.trim();
    raw.parse::<chrono::NaiveDateTime>()
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|x| x.naive_local())
        })
        .or_else(|| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            raw.parse::<chrono::NaiveDate>()
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn format_date(date: Option<&chrono::NaiveDateTime>) -> String {
    date.map_or_else(
        || "Unknown".to_string(),
        |x| x.format(DATE_FORMAT).to_string(),
    )
}

/// Counters arrive as numbers or as decimal strings; anything else is zero.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|x| *x > 0.0).map(|x| x as u64))
                .unwrap_or_default(),
            Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        },
    )
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;

    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
