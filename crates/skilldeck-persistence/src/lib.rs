//! `SkillDeck` Persistence
//!
//! User identity and bookmarks are owned by an external backend. This crate
//! defines the two narrow interfaces the rest of the workspace consumes and
//! ships two implementations of them:
//!
//! - [`RestBackend`]: a Supabase-compatible auth + row-level REST service
//! - [`SqliteBackend`]: local accounts and bookmarks in a SQLite file
//!
//! On top sit [`AuthContext`] (the single owner of auth state) and
//! [`BookmarkCache`] (the client-side set of bookmarked skill ids).

pub mod auth;
pub mod bookmarks;
pub mod error;
pub mod rest;
pub mod sqlite;

use std::collections::HashSet;

use async_trait::async_trait;
use skilldeck_types::{SkillId, User, UserId};

pub use auth::AuthContext;
pub use bookmarks::BookmarkCache;
pub use error::{BackendError, Result};
pub use rest::RestBackend;
pub use sqlite::SqliteBackend;

/// Session-based sign-in, sign-up and sign-out
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<Option<User>>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<User>;
    async fn sign_out(&self) -> Result<()>;
}

/// Row-level create/read/delete of (user, skill) bookmarks
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn list_bookmarks(&self, user_id: &UserId) -> Result<HashSet<SkillId>>;
    async fn add_bookmark(&self, user_id: &UserId, skill_id: SkillId) -> Result<()>;
    async fn remove_bookmark(&self, user_id: &UserId, skill_id: SkillId) -> Result<()>;
}
