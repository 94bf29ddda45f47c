use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use skilldeck_types::{SkillId, User, UserId};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{BackendError, Result};
use crate::{BookmarkStore, IdentityProvider};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        salt TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_bookmarks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        skill_id INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (user_id, skill_id),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_user_bookmarks_user_id ON user_bookmarks(user_id)",
];

/// Local identity and bookmark backend on SQLite
pub struct SqliteBackend {
    pool: SqlitePool,
    current: RwLock<Option<User>>,
}

impl SqliteBackend {
    /// Open (or create) the database file
    pub async fn new(database_path: &str) -> Result<Self> {
        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = SqlitePool::connect(&database_url).await?;

        let backend = Self::with_pool(pool).await?;
        info!("Local backend initialized with database: {}", database_path);
        Ok(backend)
    }

    /// Private in-memory database, gone when the backend is dropped
    pub async fn in_memory() -> Result<Self> {
        // every connection to :memory: is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let backend = Self {
            pool,
            current: RwLock::new(None),
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    async fn run_migrations(&self) -> Result<()> {
        for statement in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Database migrations completed");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl IdentityProvider for SqliteBackend {
    async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.current.read().await.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let row = sqlx::query("SELECT id, password_hash, salt FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(BackendError::InvalidCredentials);
        };

        let stored: String = row.try_get("password_hash")?;
        let salt: String = row.try_get("salt")?;
        if hash_password(&salt, password) != stored {
            return Err(BackendError::InvalidCredentials);
        }

        let user = User::new(row.try_get::<String, _>("id")?, Some(email));
        *self.current.write().await = Some(user.clone());
        info!("Signed in as {}", user.id);
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let existing = sqlx::query("SELECT id FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(BackendError::AccountExists(email));
        }

        let id = Uuid::new_v4().to_string();
        let salt = Uuid::new_v4().simple().to_string();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, salt, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&email)
        .bind(hash_password(&salt, password))
        .bind(&salt)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let user = User::new(id, Some(email));
        *self.current.write().await = Some(user.clone());
        info!("Registered local account {}", user.id);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.current.write().await = None;
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for SqliteBackend {
    async fn list_bookmarks(&self, user_id: &UserId) -> Result<HashSet<SkillId>> {
        let rows = sqlx::query("SELECT skill_id FROM user_bookmarks WHERE user_id = ?")
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<SkillId, _>("skill_id").map_err(BackendError::from))
            .collect()
    }

    async fn add_bookmark(&self, user_id: &UserId, skill_id: SkillId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_bookmarks (user_id, skill_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id.as_str())
        .bind(skill_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_bookmark(&self, user_id: &UserId, skill_id: SkillId) -> Result<()> {
        sqlx::query("DELETE FROM user_bookmarks WHERE user_id = ? AND skill_id = ?")
            .bind(user_id.as_str())
            .bind(skill_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
