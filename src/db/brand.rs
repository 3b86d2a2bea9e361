//! Brand profile store. Readers always get a complete profile: a user
//! without a saved row sees [`BrandProfile::default`].

use chrono::Utc;
use sqlx::SqlitePool;

use super::models::{BrandProfile, BrandProfileInput, Platform};
use crate::error::AppResult;

pub const DEFAULT_BRAND_COLORS: &str = "#3B82F6,#1E40AF,#FFFFFF,#F3F4F6";
pub const DEFAULT_TYPOGRAPHY: &str = "Inter, sans-serif";
pub const DEFAULT_TONE: &str = "profesional";
pub const DEFAULT_VISUAL_STYLE: &str = "moderno";
pub const DEFAULT_IMAGE_STYLE: &str = "profesional, limpio, moderno";
pub const DEFAULT_PLATFORMS: [Platform; 2] = [Platform::Instagram, Platform::Linkedin];

impl Default for BrandProfile {
    fn default() -> Self {
        Self {
            brand_name: String::new(),
            brand_colors: DEFAULT_BRAND_COLORS.to_string(),
            typography_primary: DEFAULT_TYPOGRAPHY.to_string(),
            typography_secondary: DEFAULT_TYPOGRAPHY.to_string(),
            communication_tone: DEFAULT_TONE.to_string(),
            visual_style: DEFAULT_VISUAL_STYLE.to_string(),
            logo_url: String::new(),
            industry: String::new(),
            target_audience: String::new(),
            brand_values: String::new(),
            content_themes: String::new(),
            image_style_preferences: DEFAULT_IMAGE_STYLE.to_string(),
            platforms: String::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl BrandProfile {
    /// Comma-separated platform list; unknown names are skipped and an empty
    /// result falls back to instagram + linkedin.
    pub fn platform_rotation(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = Vec::new();
        for platform in self.platforms.split(',').filter_map(Platform::parse) {
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }
        if platforms.is_empty() {
            DEFAULT_PLATFORMS.to_vec()
        } else {
            platforms
        }
    }

    /// First entry of the palette, if any
    pub fn primary_color(&self) -> Option<&str> {
        self.color_list().into_iter().next()
    }

    pub fn color_list(&self) -> Vec<&str> {
        self.brand_colors
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BrandStore {
    pool: SqlitePool,
}

impl BrandStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: i64) -> AppResult<Option<BrandProfile>> {
        let profile = sqlx::query_as::<_, BrandProfile>(
            r#"
            SELECT brand_name, brand_colors, typography_primary, typography_secondary,
                   communication_tone, visual_style, logo_url, industry, target_audience,
                   brand_values, content_themes, image_style_preferences, platforms,
                   created_at, updated_at
            FROM brand_preferences
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn get(&self, user_id: i64) -> AppResult<BrandProfile> {
        Ok(self.find(user_id).await?.unwrap_or_default())
    }

    /// Insert on first save, overwrite every field afterwards.
    pub async fn upsert(&self, user_id: i64, input: &BrandProfileInput) -> AppResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO brand_preferences (
                user_id, brand_name, brand_colors, typography_primary, typography_secondary,
                communication_tone, visual_style, logo_url, industry, target_audience,
                brand_values, content_themes, image_style_preferences, platforms,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                brand_name = excluded.brand_name,
                brand_colors = excluded.brand_colors,
                typography_primary = excluded.typography_primary,
                typography_secondary = excluded.typography_secondary,
                communication_tone = excluded.communication_tone,
                visual_style = excluded.visual_style,
                logo_url = excluded.logo_url,
                industry = excluded.industry,
                target_audience = excluded.target_audience,
                brand_values = excluded.brand_values,
                content_themes = excluded.content_themes,
                image_style_preferences = excluded.image_style_preferences,
                platforms = excluded.platforms,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&input.brand_name)
        .bind(&input.brand_colors)
        .bind(&input.typography_primary)
        .bind(&input.typography_secondary)
        .bind(&input.communication_tone)
        .bind(&input.visual_style)
        .bind(&input.logo_url)
        .bind(&input.industry)
        .bind(&input.target_audience)
        .bind(&input.brand_values)
        .bind(&input.content_themes)
        .bind(&input.image_style_preferences)
        .bind(&input.platforms)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
