//! Post store. Every statement is scoped by owner, so a post that belongs
//! to someone else is indistinguishable from one that does not exist.

use chrono::Utc;
use sqlx::SqlitePool;

use super::models::{NewPost, Post, PostStatus, PostUpdate};
use crate::error::{AppError, AppResult};

const POST_COLUMNS: &str = "id, user_id, title, content, platform, content_type, \
    scheduled_date, scheduled_time, hashtags, media_files, status, created_at";

fn post_not_found() -> AppError {
    AppError::not_found("Post not found")
}

#[derive(Debug, Clone)]
pub struct PostStore {
    pool: SqlitePool,
}

impl PostStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Newest scheduled date first.
    pub async fn list(&self, user_id: i64) -> AppResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {}
            FROM posts
            WHERE user_id = ?
            ORDER BY scheduled_date DESC, scheduled_time ASC, id ASC
            "#,
            POST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn get(&self, user_id: i64, post_id: i64) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE id = ? AND user_id = ?",
            POST_COLUMNS
        ))
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(post_not_found)
    }

    pub async fn update(&self, user_id: i64, post_id: i64, update: &PostUpdate) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET
                title = ?, content = ?, content_type = ?, hashtags = ?,
                scheduled_date = ?, scheduled_time = ?, platform = ?, media_files = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(update.content_type)
        .bind(&update.hashtags)
        .bind(update.scheduled_date)
        .bind(&update.scheduled_time)
        .bind(update.platform)
        .bind(&update.media_files)
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(post_not_found());
        }

        Ok(())
    }

    pub async fn delete(&self, user_id: i64, post_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(post_not_found());
        }

        Ok(())
    }

    /// Moves every draft of the user to approved and returns how many changed.
    pub async fn approve_all_drafts(&self, user_id: i64) -> AppResult<u64> {
        let result = sqlx::query("UPDATE posts SET status = ? WHERE user_id = ? AND status = ?")
            .bind(PostStatus::Approved)
            .bind(user_id)
            .bind(PostStatus::Draft)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes all of the user's posts and inserts `posts` as drafts, in one
    /// transaction. Nothing is visible to other readers until commit.
    pub async fn replace_all(&self, user_id: i64, posts: &[NewPost]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM posts WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let now = Utc::now();
        for post in posts {
            sqlx::query(
                r#"
                INSERT INTO posts (
                    user_id, title, content, platform, content_type,
                    scheduled_date, scheduled_time, hashtags, media_files, status, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, '', ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.platform)
            .bind(post.content_type)
            .bind(post.scheduled_date)
            .bind(&post.scheduled_time)
            .bind(&post.hashtags)
            .bind(PostStatus::Draft)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(user_id, deleted, inserted = posts.len(), "posts replaced");
        Ok(posts.len() as u64)
    }
}
