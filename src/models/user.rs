use super::UserId;
use serde::{Deserialize, Serialize};

/// Largest avatar image the backend accepts.
pub const AVATAR_MAX_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_datetime")]
    pub join_date: Option<chrono::NaiveDateTime>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_admin: bool,
}

impl UserProfile {
    /// One or two letters shown when there is no avatar image.
    pub fn initials(&self) -> String {
        let words: Vec<&str> = self
            .username
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-' || c == '.')
            .filter(|x| !x.is_empty())
            .collect();
        let initials: String = match words.as_slice() {
            [] => "?".into(),
            [only] => only.chars().take(2).collect(),
            [first, second, ..] => first.chars().take(1).chain(second.chars().take(1)).collect(),
        };
        initials.to_uppercase()
    }

    /// Stable hue for the initials avatar, from a 32-bit rolling hash.
    pub fn avatar_hue(&self) -> u32 {
        let hash = self.username.chars().fold(0i32, |acc, c| {
            (c as i32).wrapping_add(acc.wrapping_shl(5).wrapping_sub(acc))
        });
        hash.unsigned_abs() % 360
    }
}

static EMAIL_REGEX: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();

/// Body of `POST /api/user/profile`.
#[derive(Debug, Default, Serialize, Clone, PartialEq)]
pub struct ProfileUpdate {
    username: String,
    email: String,
    bio: String,
}

impl ProfileUpdate {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            username: profile.username.clone(),
            email: profile.email.clone().unwrap_or_default(),
            bio: profile.bio.clone().unwrap_or_default(),
        }
    }

    #[inline]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[inline]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[inline]
    pub fn bio(&self) -> &str {
        &self.bio
    }

    pub fn set_username(mut self, username: String) -> Result<Self, String> {
        let username = username.trim().to_string();
        if username.chars().count() < 3 {
            return Err(format!(
                "Username {username} is too short, at least 3 characters"
            ));
        }
        self.username = username;
        Ok(self)
    }

    fn validate_email(email: &str) -> bool {
        EMAIL_REGEX
            .get_or_init(|| regex::Regex::new(r"^[\w\-\.]+@([\w-]+\.)+\w{2,}$").unwrap())
            .is_match(email)
    }

    pub fn set_email(mut self, email: String) -> Result<Self, String> {
        let email = email.trim().to_string();
        if !Self::validate_email(&email) {
            return Err(format!(
                "The email {email} is invalid, provide a correct one"
            ));
        }
        self.email = email;
        Ok(self)
    }

    #[inline]
    pub fn set_bio(mut self, bio: String) -> Self {
        self.bio = bio.trim().to_string();
        self
    }
}

/// An avatar image chosen by the viewer, checked before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarUpload {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn new(file_name: String, mime: String, bytes: Vec<u8>) -> Result<Self, String> {
        if mime != "image/jpeg" && mime != "image/png" {
            return Err("Only JPG and PNG images are supported".into());
        }
        Self::check_size(bytes.len())?;
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Size check that can run before the file is read into memory.
    pub fn check_size(len: usize) -> Result<(), String> {
        if len > AVATAR_MAX_BYTES {
            return Err("Image size cannot exceed 2MB".into());
        }
        Ok(())
    }

    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[inline]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_validates_fields() {
        let update = ProfileUpdate::default()
            .set_username("  ferris ".into())
            .unwrap()
            .set_email("ferris@rust-lang.org".into())
            .unwrap()
            .set_bio(" crab ".into());
        assert_eq!(update.username(), "ferris");
        assert_eq!(update.bio(), "crab");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"username": "ferris", "email": "ferris@rust-lang.org", "bio": "crab"})
        );

        assert!(ProfileUpdate::default().set_username("ab".into()).is_err());
        assert!(ProfileUpdate::default().set_email("not-an-email".into()).is_err());
    }

    #[test]
    fn avatar_must_be_small_jpeg_or_png() {
        assert!(AvatarUpload::new("a.png".into(), "image/png".into(), vec![0; 16]).is_ok());
        assert!(AvatarUpload::new("a.gif".into(), "image/gif".into(), vec![0; 16]).is_err());
        assert!(AvatarUpload::new(
            "a.jpg".into(),
            "image/jpeg".into(),
            vec![0; AVATAR_MAX_BYTES + 1]
        )
        .is_err());
        assert!(AvatarUpload::check_size(AVATAR_MAX_BYTES).is_ok());
    }

    #[test]
    fn initials_and_hue_are_stable() {
        let user = UserProfile {
            username: "jeffrey_lee".into(),
            ..Default::default()
        };
        assert_eq!(user.initials(), "JL");
        assert_eq!(user.avatar_hue(), user.clone().avatar_hue());
        assert!(user.avatar_hue() < 360);

        let short = UserProfile {
            username: "bo".into(),
            ..Default::default()
        };
        assert_eq!(short.initials(), "BO");
    }
}
