//! Database Models - row types and the enums stored in text columns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Reads an explicit JSON `null` the same as an omitted field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Instagram,
    Linkedin,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "instagram" => Some(Platform::Instagram),
            "linkedin" => Some(Platform::Linkedin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Image,
    Carousel,
    Video,
    Text,
}

/// Rotation order used by the calendar generator
pub const CONTENT_TYPE_CYCLE: [ContentType; 4] = [
    ContentType::Image,
    ContentType::Carousel,
    ContentType::Video,
    ContentType::Text,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Approved,
}

/// User model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub session_token_hash: Option<String>,
    pub session_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// User info returned to the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}

/// Brand preferences, one row per user at most
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BrandProfile {
    pub brand_name: String,
    pub brand_colors: String,
    pub typography_primary: String,
    pub typography_secondary: String,
    pub communication_tone: String,
    pub visual_style: String,
    pub logo_url: String,
    pub industry: String,
    pub target_audience: String,
    pub brand_values: String,
    pub content_themes: String,
    pub image_style_preferences: String,
    pub platforms: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Brand profile fields accepted on save. Anything omitted or null is stored as "".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandProfileInput {
    #[serde(deserialize_with = "null_as_default")]
    pub brand_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub brand_colors: String,
    #[serde(deserialize_with = "null_as_default")]
    pub typography_primary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub typography_secondary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub communication_tone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub visual_style: String,
    #[serde(deserialize_with = "null_as_default")]
    pub logo_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(deserialize_with = "null_as_default")]
    pub target_audience: String,
    #[serde(deserialize_with = "null_as_default")]
    pub brand_values: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content_themes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_style_preferences: String,
    #[serde(deserialize_with = "null_as_default")]
    pub platforms: String,
}

/// Post model
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: String,
    pub hashtags: String,
    pub media_files: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

/// A post ready for insertion; owner and id are assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    pub hashtags: String,
}

/// Full-field overwrite applied by the post editor
#[derive(Debug, Clone, PartialEq)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub content_type: ContentType,
    pub hashtags: String,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: String,
    pub platform: Platform,
    pub media_files: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse_is_lenient_about_case() {
        assert_eq!(Platform::parse(" LinkedIn "), Some(Platform::Linkedin));
        assert_eq!(Platform::parse("instagram"), Some(Platform::Instagram));
        assert_eq!(Platform::parse("tiktok"), None);
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContentType::Carousel).unwrap(),
            "\"carousel\""
        );
        assert_eq!(
            serde_json::to_string(&PostStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"client\"");
    }

    #[test]
    fn test_brand_input_missing_fields_become_empty() {
        let input: BrandProfileInput =
            serde_json::from_str(r#"{"brand_name":"Acme"}"#).unwrap();
        assert_eq!(input.brand_name, "Acme");
        assert_eq!(input.industry, "");
        assert_eq!(input.platforms, "");
    }

    #[test]
    fn test_brand_input_null_fields_become_empty() {
        let input: BrandProfileInput =
            serde_json::from_str(r#"{"brand_name":"Acme","industry":null,"logo_url":null}"#)
                .unwrap();
        assert_eq!(input.brand_name, "Acme");
        assert_eq!(input.industry, "");
        assert_eq!(input.logo_url, "");
    }
}
