pub mod brand;
pub mod models;
pub mod posts;
pub mod users;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DbConfig;
use models::Role;

/// Accounts created at startup when missing: (email, password, name, role)
pub const SEED_USERS: &[(&str, &str, &str, Role)] = &[
    (
        "admin@maddalenamarketing.com",
        "admin123",
        "Charly Maddalena",
        Role::Admin,
    ),
    ("cliente1@empresa.com", "cliente123", "Cliente Uno", Role::Client),
];

pub async fn init_pool(config: &DbConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Initializing database connection pool...");

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to an in-memory database gets its own empty database,
    // so the pool must hold exactly one connection that never expires.
    let in_memory = config.url.contains(":memory:");
    let builder = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
    };

    let pool = builder
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!(in_memory, "Database connection pool initialized");

    Ok(pool)
}

pub async fn health_check(pool: &SqlitePool) -> Result<Duration, sqlx::Error> {
    let start = std::time::Instant::now();
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(start.elapsed())
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            full_name TEXT NOT NULL DEFAULT '',
            role TEXT NOT NULL DEFAULT 'client',
            session_token_hash TEXT,
            session_expires_at TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_session_token_hash ON users(session_token_hash)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS brand_preferences (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            brand_name TEXT NOT NULL DEFAULT '',
            brand_colors TEXT NOT NULL DEFAULT '',
            typography_primary TEXT NOT NULL DEFAULT '',
            typography_secondary TEXT NOT NULL DEFAULT '',
            communication_tone TEXT NOT NULL DEFAULT '',
            visual_style TEXT NOT NULL DEFAULT '',
            logo_url TEXT NOT NULL DEFAULT '',
            industry TEXT NOT NULL DEFAULT '',
            target_audience TEXT NOT NULL DEFAULT '',
            brand_values TEXT NOT NULL DEFAULT '',
            content_themes TEXT NOT NULL DEFAULT '',
            image_style_preferences TEXT NOT NULL DEFAULT '',
            platforms TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT '',
            platform TEXT NOT NULL DEFAULT 'instagram',
            content_type TEXT NOT NULL DEFAULT 'image',
            scheduled_date TEXT,
            scheduled_time TEXT NOT NULL DEFAULT '',
            hashtags TEXT NOT NULL DEFAULT '',
            media_files TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'draft',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_posts_user_scheduled ON posts(user_id, scheduled_date DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_user_status ON posts(user_id, status)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}

/// Inserts the fixed accounts that are not present yet. Safe to run on every start.
pub async fn seed_users(
    pool: &SqlitePool,
    bcrypt_cost: u32,
) -> Result<usize, crate::error::AppError> {
    let mut created = 0;

    for &(email, password, full_name, role) in SEED_USERS {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        let password_hash = users::hash_password(password.to_string(), bcrypt_cost).await?;

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (email, password_hash, full_name, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(email)
        .bind(&password_hash)
        .bind(full_name)
        .bind(role)
        .bind(chrono::Utc::now())
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(email, role = ?role, "seeded user");
            created += 1;
        }
    }

    Ok(created)
}

/// Lowest cost bcrypt accepts; keeps test hashing fast.
#[cfg(test)]
pub(crate) const TEST_BCRYPT_COST: u32 = 4;

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        acquire_timeout_secs: 5,
    };
    let pool = init_pool(&config).await.unwrap();
    run_migrations(&pool).await.unwrap();
    seed_users(&pool, TEST_BCRYPT_COST).await.unwrap();
    pool
}
