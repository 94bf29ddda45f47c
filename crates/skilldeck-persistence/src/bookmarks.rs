use std::collections::HashSet;
use std::sync::Arc;

use skilldeck_types::{SkillId, User, UserId};
use tracing::{debug, error};

use crate::BookmarkStore;

/// Bookmarked skill ids for the signed-in user.
///
/// The cache only changes after the store confirms a write, so a failed
/// mutation leaves it exactly as it was.
pub struct BookmarkCache {
    store: Arc<dyn BookmarkStore>,
    user: Option<UserId>,
    ids: HashSet<SkillId>,
}

impl BookmarkCache {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            store,
            user: None,
            ids: HashSet::new(),
        }
    }

    /// Replace the cache wholesale for `user`, or clear it when signed out
    pub async fn refresh(&mut self, user: Option<&User>) {
        self.user = user.map(|u| u.id.clone());
        self.ids.clear();

        let Some(user_id) = &self.user else {
            return;
        };

        match self.store.list_bookmarks(user_id).await {
            Ok(ids) => {
                debug!("Loaded {} bookmarks for {}", ids.len(), user_id);
                self.ids = ids;
            }
            Err(e) => error!("Error fetching bookmarks: {}", e),
        }
    }

    pub async fn add(&mut self, skill_id: SkillId) -> bool {
        let Some(user_id) = &self.user else {
            return false;
        };

        match self.store.add_bookmark(user_id, skill_id).await {
            Ok(()) => {
                self.ids.insert(skill_id);
                true
            }
            Err(e) => {
                error!("Error adding bookmark: {}", e);
                false
            }
        }
    }

    pub async fn remove(&mut self, skill_id: SkillId) -> bool {
        let Some(user_id) = &self.user else {
            return false;
        };

        match self.store.remove_bookmark(user_id, skill_id).await {
            Ok(()) => {
                self.ids.remove(&skill_id);
                true
            }
            Err(e) => {
                error!("Error removing bookmark: {}", e);
                false
            }
        }
    }

    /// Add or remove depending on the cached state
    pub async fn toggle(&mut self, skill_id: SkillId) -> bool {
        if self.contains(skill_id) {
            self.remove(skill_id).await
        } else {
            self.add(skill_id).await
        }
    }

    pub fn contains(&self, skill_id: SkillId) -> bool {
        self.ids.contains(&skill_id)
    }

    pub fn ids(&self) -> &HashSet<SkillId> {
        &self.ids
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}
